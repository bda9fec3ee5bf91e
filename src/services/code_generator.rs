//! Short code generation
//!
//! Generators only produce candidates. Uniqueness is decided by the store
//! when the registry tries to insert.

use crate::utils::{MAX_CODE_LENGTH, MIN_CODE_LENGTH, generate_random_code};

/// Source of candidate short codes.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Uniformly random `[A-Za-z0-9]` codes of a fixed length.
#[derive(Debug, Clone, Copy)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    /// `length` is clamped into the valid 6..=8 range.
    pub fn new(length: usize) -> Self {
        Self {
            length: length.clamp(MIN_CODE_LENGTH, MAX_CODE_LENGTH),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(MIN_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_random_code(self.length)
    }
}
