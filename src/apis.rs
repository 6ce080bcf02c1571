pub mod icanhazdadjoke;
