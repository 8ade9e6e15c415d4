pub mod assessment_dto;
pub mod request;
pub mod response;
