use rand::Rng;
use std::collections::HashSet;
use std::sync::Mutex;

const CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const DEFAULT_CODE_LENGTH: usize = 8;

/// Generates booking confirmation codes, unique for the process lifetime
///
/// Codes are uppercase alphanumeric. Collisions against already-issued
/// codes are re-drawn, so uniqueness holds even for short lengths.
#[derive(Debug)]
pub struct ConfirmationCodeGenerator {
    length: usize,
    issued: Mutex<HashSet<String>>,
}

impl ConfirmationCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self {
            length: length.max(4),
            issued: Mutex::new(HashSet::new()),
        }
    }

    pub fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        let mut issued = match self.issued.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        loop {
            let code: String = (0..self.length)
                .map(|_| {
                    let idx = rng.gen_range(0..CODE_CHARSET.len());
                    CODE_CHARSET[idx] as char
                })
                .collect();

            if issued.insert(code.clone()) {
                return code;
            }
        }
    }
}

impl Default for ConfirmationCodeGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_CODE_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_format() {
        let generator = ConfirmationCodeGenerator::default();
        let code = generator.generate();

        assert_eq!(code.len(), 8);
        assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_codes_unique_within_process() {
        let generator = ConfirmationCodeGenerator::default();
        let mut seen = HashSet::new();

        for _ in 0..1000 {
            assert!(seen.insert(generator.generate()));
        }
    }

    #[test]
    fn test_minimum_length_enforced() {
        let generator = ConfirmationCodeGenerator::new(1);
        assert_eq!(generator.generate().len(), 4);
    }
}
