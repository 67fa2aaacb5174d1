pub mod movie;
pub mod user;

pub use movie::{CastMember, Credits, Genre, Movie, MovieDetails, Page, Review, Video, VideoList};
pub use user::User;
