//! Static course content: the data model, the catalog, editing helpers and
//! structural validation.

mod catalog;
mod editor;
mod model;
pub mod validate;

pub use catalog::CourseCatalog;
pub use model::{
    Course, CourseInfo, Introduction, Lesson, LessonOutline, Project, Question, Quiz, QuizKind,
    PLACEHOLDER_IMAGE_URL, PLACEHOLDER_VIDEO_URL,
};
pub use validate::{slugify, validate_course, validate_lesson, Issue, Minimums};
