//! Fresh signed payload per attempt.

use crate::error::{ReaderError, ReaderResult};
use rand::seq::SliceRandom;
use rand::Rng;
use read_signature::{RequestPayload, SignatureEngine, SIGNATURE_KEY};

/// Upper bound (inclusive) for the `ts` jitter in milliseconds.
const MAX_TS_JITTER_MS: i64 = 1000;
/// Upper bound (inclusive) for the `rn` nonce.
const MAX_NONCE: i64 = 1000;

/// Builds a new payload from the fixed template for every attempt.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    template: RequestPayload,
    books: Vec<String>,
    chapters: Vec<String>,
    engine: SignatureEngine,
}

impl PayloadBuilder {
    pub fn new(
        template: RequestPayload,
        books: Vec<String>,
        chapters: Vec<String>,
        engine: SignatureEngine,
    ) -> ReaderResult<Self> {
        if books.is_empty() {
            return Err(ReaderError::EmptyPool("books"));
        }
        if chapters.is_empty() {
            return Err(ReaderError::EmptyPool("chapters"));
        }
        Ok(Self {
            template,
            books,
            chapters,
            engine,
        })
    }

    pub fn engine(&self) -> &SignatureEngine {
        &self.engine
    }

    /// Build and seal the payload for an attempt made at `now` (unix
    /// seconds), given the time of the last confirmed success.
    pub fn build<R: Rng>(
        &self,
        rng: &mut R,
        now: i64,
        last_success: i64,
    ) -> ReaderResult<RequestPayload> {
        let mut payload = self.template.clone();
        payload.remove(SIGNATURE_KEY);

        let book = self
            .books
            .choose(rng)
            .ok_or(ReaderError::EmptyPool("books"))?;
        let chapter = self
            .chapters
            .choose(rng)
            .ok_or(ReaderError::EmptyPool("chapters"))?;
        let ts = now * 1000 + rng.gen_range(0..=MAX_TS_JITTER_MS);
        let rn = rng.gen_range(0..=MAX_NONCE);

        payload.set("b", book.as_str());
        payload.set("c", chapter.as_str());
        payload.set("ct", now);
        payload.set("rt", now - last_success);
        payload.set("ts", ts);
        payload.set("rn", rn);
        payload.set("sg", self.engine.checksum(ts, rn));

        Ok(self.engine.sign(payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use read_signature::PayloadValue;

    fn builder() -> PayloadBuilder {
        let mut template = RequestPayload::new();
        template.set("appId", "wb182564874663h776775553");
        template.set("ci", 27);
        template.set("s", "stale");
        PayloadBuilder::new(
            template,
            vec!["book-a".to_string(), "book-b".to_string()],
            vec!["chapter-a".to_string()],
            SignatureEngine::default(),
        )
        .unwrap()
    }

    fn int(payload: &RequestPayload, key: &str) -> i64 {
        match payload.get(key) {
            Some(PayloadValue::Int(value)) => *value,
            other => panic!("expected integer {key}, got {other:?}"),
        }
    }

    #[test]
    fn test_build_populates_every_field() {
        let mut rng = StdRng::seed_from_u64(7);
        let payload = builder().build(&mut rng, 1_744_264_311, 1_744_264_281).unwrap();

        assert_eq!(int(&payload, "ct"), 1_744_264_311);
        assert_eq!(int(&payload, "rt"), 30);
        let ts = int(&payload, "ts");
        assert!((1_744_264_311_000..=1_744_264_312_000).contains(&ts));
        let rn = int(&payload, "rn");
        assert!((0..=1000).contains(&rn));

        let book = payload.get("b").unwrap().to_string();
        assert!(book == "book-a" || book == "book-b");
        assert_eq!(payload.get("c"), Some(&PayloadValue::from("chapter-a")));
        assert_eq!(payload.get("ci"), Some(&PayloadValue::Int(27)));
    }

    #[test]
    fn test_build_checksum_and_signature_are_consistent() {
        let builder = builder();
        let mut rng = StdRng::seed_from_u64(11);
        let payload = builder.build(&mut rng, 1_744_264_311, 1_744_264_300).unwrap();

        let expected_sg = builder
            .engine()
            .checksum(int(&payload, "ts"), int(&payload, "rn"));
        assert_eq!(payload.get("sg"), Some(&PayloadValue::Str(expected_sg)));

        let expected_s = builder.engine().signature(&payload);
        assert_eq!(payload.signature(), Some(&PayloadValue::Str(expected_s)));
        assert_ne!(payload.signature(), Some(&PayloadValue::from("stale")));
    }

    #[test]
    fn test_build_is_deterministic_for_a_seed() {
        let builder = builder();
        let a = builder
            .build(&mut StdRng::seed_from_u64(3), 100, 70)
            .unwrap();
        let b = builder
            .build(&mut StdRng::seed_from_u64(3), 100, 70)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_empty_pools_rejected() {
        let err = PayloadBuilder::new(
            RequestPayload::new(),
            Vec::new(),
            vec!["c".to_string()],
            SignatureEngine::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ReaderError::EmptyPool("books")));

        let err = PayloadBuilder::new(
            RequestPayload::new(),
            vec!["b".to_string()],
            Vec::new(),
            SignatureEngine::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ReaderError::EmptyPool("chapters")));
    }
}
