mod config;
mod lookup;
mod unused;
mod usages;
