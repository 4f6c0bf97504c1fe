pub mod licenses;
