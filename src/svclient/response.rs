pub mod apiresponse;
pub mod channel;
pub mod playlist;
pub mod user;
pub mod video;
