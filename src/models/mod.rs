pub mod course;
pub mod meta;
pub mod rating;

pub use course::{
    Course, CourseAnalytics, CourseDetail, CourseStatus, CourseType, SemesterTerm,
    SpecialityBadge,
};
pub use meta::{FilterOption, FilterOptions, LoginRequest, Page, Session, SessionUser};
pub use rating::{FieldErrors, Rating, RatingForm, RatingPayload, StudentRating, VoteType};
