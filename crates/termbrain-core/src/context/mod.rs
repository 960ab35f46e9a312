mod assembler;

pub use assembler::{AssembledPrompt, ContextAssembler};
