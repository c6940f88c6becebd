//! Configuration module

mod site;

pub use site::CmsConfig;
pub use site::EmailConfig;
pub use site::SiteConfig;
