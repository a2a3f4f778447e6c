pub mod widget_commands;
