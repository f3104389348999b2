pub mod blink_service;
