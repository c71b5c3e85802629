pub mod backdrop_model;
