/// Course identifier as typed by the user.
/// Examples: `12345`, `sis_course_id:DIP-2024-C1-A`
pub type CourseId = String;
/// Program (account) identifier rendered as text.
/// Example: `412`
pub type AccountId = String;
/// Program display name, or one of the placeholder labels.
/// Examples: `Diplomado en Gestión`, `Failed to load`
pub type ProgramName = String;
/// Sub-course number within a program.
/// Example: `1` for "Course 1"
pub type Ordinal = u64;
