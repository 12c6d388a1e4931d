pub mod common;

use embassy_futures::select::select;
use embassy_futures::{block_on, yield_now};
use michele::PointerEvent;
use michele::channel::{KEY_EVENT_CHANNEL, POINTER_CHANNEL};
use michele::types::keycode::KeyCode;

use crate::common::{HostEvent::*, create_test_keyboard, pos, press, release, report};

#[test]
fn test_run_drains_channels() {
    let (mut keyboard, host) = create_test_keyboard();

    block_on(async {
        KEY_EVENT_CHANNEL.clear();
        POINTER_CHANNEL.clear();

        KEY_EVENT_CHANNEL.send(press(pos::Q.0, pos::Q.1, 0)).await;
        KEY_EVENT_CHANNEL.send(release(pos::Q.0, pos::Q.1, 10)).await;
        POINTER_CHANNEL.send(PointerEvent::Single(report(-7, 0))).await;

        select(keyboard.run(), async {
            while host.events().len() < 5 {
                yield_now().await;
            }
        })
        .await;
    });

    assert_eq!(
        host.events(),
        [
            Register(KeyCode::Q),
            Unregister(KeyCode::Q),
            Register(KeyCode::End),
            Unregister(KeyCode::End),
            Mouse(0, 0, 0)
        ]
    );
}
