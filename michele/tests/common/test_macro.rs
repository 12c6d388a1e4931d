extern crate michele;

/// Feed key events to a keyboard: `[(row, col), pressed, time in ms]`
#[macro_export]
macro_rules! key_sequence {
    ($keyboard:expr, [$([$pos:expr, $pressed:expr, $time:expr]),* $(,)?]) => {
        $(
            $keyboard.process_key(michele::KeyEvent {
                pos: michele::KeyPos::new($pos.0, $pos.1),
                pressed: $pressed,
                time: embassy_time::Instant::from_millis($time),
            });
        )*
    };
}

/// Press and release a key: `[(row, col), press time, release time]`
#[macro_export]
macro_rules! taps {
    ($keyboard:expr, [$([$pos:expr, $down:expr, $up:expr]),* $(,)?]) => {
        $(
            $crate::key_sequence!($keyboard, [[$pos, true, $down], [$pos, false, $up]]);
        )*
    };
}
