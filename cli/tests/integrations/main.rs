mod interactive;
mod run;
mod server;
