pub mod use_cases;

pub use use_cases::evaluate::EvaluateUseCase;
pub use use_cases::phrases::PhrasesUseCase;
