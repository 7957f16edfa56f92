mod connect_dialog;
mod details;
mod legend;
mod panels;
