mod interaction;
mod view;

pub(in crate::app) use interaction::zoom_with_wheel;
