pub mod angle;
pub mod calibrate;
pub mod export;
pub mod info;
pub mod pick_color;
pub mod record;
pub mod replay;
pub mod validate;
