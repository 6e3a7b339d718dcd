//! Property tests for text input editing.

use hs_core::event::{Event, KeyCode};
use hs_widgets::TextInput;
use proptest::prelude::*;
use unicode_segmentation::UnicodeSegmentation;

fn key_strategy() -> impl Strategy<Value = KeyCode> {
    prop_oneof![
        prop_oneof![prop::char::range(' ', '~'), Just('\u{301}'), Just('日')]
            .prop_map(KeyCode::Char),
        Just(KeyCode::Backspace),
        Just(KeyCode::Delete),
        Just(KeyCode::Left),
        Just(KeyCode::Right),
        Just(KeyCode::Home),
        Just(KeyCode::End),
    ]
}

proptest! {
    #[test]
    fn cursor_stays_within_value(keys in prop::collection::vec(key_strategy(), 0..64)) {
        let mut input = TextInput::new().with_focused(true);
        for key in keys {
            input.handle_event(&Event::key(key));
            let count = input.value().graphemes(true).count();
            prop_assert!(input.cursor() <= count);
        }
    }

    #[test]
    fn typed_ascii_is_the_value(text in "[a-zA-Z0-9 ]{0,40}") {
        let mut input = TextInput::new().with_focused(true);
        for c in text.chars() {
            input.handle_event(&Event::key(KeyCode::Char(c)));
        }
        prop_assert_eq!(input.value(), text.as_str());
    }
}
