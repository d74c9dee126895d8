pub mod feed;
pub mod home;
pub mod lib;
pub mod liked;
pub mod login;
pub mod newplaylist;
pub mod notifier;
pub mod playlistpicker;
pub mod search;
pub mod subscriptions;
pub mod traits;
