mod image_tests;
mod instance_tests;
