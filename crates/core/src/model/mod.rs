mod ids;
mod option;
mod question;

pub use ids::{OptionId, QuestionId};
pub use option::AnswerOption;
pub use question::{AnswerMode, CorrectAnswer, Question, QuestionError};
