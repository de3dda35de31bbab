pub mod poly1305;
