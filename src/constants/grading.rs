/// Weight given to a question that does not declare `points`.
pub const DEFAULT_QUESTION_POINTS: i32 = 1;

/// Essay answers pass when trimmed length and word count both reach these floors.
pub const ESSAY_MIN_CHARS: usize = 20;
pub const ESSAY_MIN_WORDS: usize = 5;

pub const MIN_TIME_LIMIT_MINUTES: i16 = 5;
pub const MAX_TIME_LIMIT_MINUTES: i16 = 180;

pub const MIN_PASSING_SCORE: i16 = 0;
pub const MAX_PASSING_SCORE: i16 = 100;

pub const MIN_ATTEMPTS: i16 = 1;
pub const MAX_ATTEMPTS_CEILING: i16 = 10;

/// Per-question weight ceiling. With `MAX_QUESTIONS` this keeps every
/// point total well inside `i32`.
pub const MAX_QUESTION_POINTS: i32 = 1_000;
pub const MAX_QUESTIONS: usize = 500;

pub const MAX_STUDENT_NAME_CHARS: u64 = 100;
