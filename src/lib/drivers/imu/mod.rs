pub mod icm20948;
mod icm20948_constants;
