pub mod support;

mod sync_channel_tests;
