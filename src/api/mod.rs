pub mod metals;
