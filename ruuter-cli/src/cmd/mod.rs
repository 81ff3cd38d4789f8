pub mod openapi;
pub mod run;
pub mod serve;
pub mod validate;
