pub mod generate_article;
pub mod generate_blog_title;
pub mod generate_image;
pub mod remove_image_background;
pub mod remove_image_object;
pub mod review_resume;
pub mod utils;

pub use generate_article::generate_article;
pub use generate_blog_title::generate_blog_title;
pub use generate_image::generate_image;
pub use remove_image_background::remove_image_background;
pub use remove_image_object::remove_image_object;
pub use review_resume::review_resume;
