// siftq -- the test and inspection harness around the sift engine.
//
// The library half holds everything the subcommands and the integration
// tests share: the JSON fixture model, the JSON-backed column getter, and
// the fixture runner.

pub mod fixture;
pub mod json_rows;
pub mod runner;
