pub mod faq_overview;
pub mod pipeline;
