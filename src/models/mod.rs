pub mod courses;
pub mod professors;
pub mod scores;

pub use courses::{entities::Course, requests::CreateCourseRequest};
pub use professors::entities::Professor;
pub use scores::{
    entities::{Grade, SubScores},
    requests::{GradeRequest, ScoreFilter},
    responses::ScoreAggregate,
};
