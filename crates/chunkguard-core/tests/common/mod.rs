pub mod cdn_host;
