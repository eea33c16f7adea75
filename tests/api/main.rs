mod health;
mod session;
