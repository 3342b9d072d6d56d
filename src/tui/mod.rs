pub mod app;
pub mod cmd;
pub mod context;
pub mod grouped_list;
pub mod history;
pub mod keymap;
pub mod listener;
pub mod status_bar;
pub mod text_input;
pub mod theme;
pub mod viewport;
pub mod views;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use app::run;
