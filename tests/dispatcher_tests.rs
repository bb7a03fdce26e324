//! End-to-end reply behaviour of the dispatcher against recording fakes.

mod common;

use common::*;
use weather_bot::{
    DispatchOutcome, LocationQuery, Update, WeatherObservation,
    errors::{
        CAPABILITIES_MESSAGE, FILE_UNAVAILABLE_MESSAGE, SYNTHESIS_FAILED_MESSAGE,
        TRANSCRIPTION_FAILED_MESSAGE, UPSTREAM_UNAVAILABLE_MESSAGE,
    },
    services::{HELP_MESSAGE, START_MESSAGE, UNKNOWN_PLACE_MESSAGE},
};

fn update(value: serde_json::Value) -> Update {
    serde_json::from_value(value).expect("valid update")
}

#[tokio::test]
async fn test_text_place_gets_one_weather_reply() {
    let harness = Harness::happy();

    let outcome = harness
        .dispatcher
        .dispatch(&update(text_update(42, "London")))
        .await;

    assert_eq!(
        outcome,
        DispatchOutcome::Replied {
            kind: "text",
            result: "ok",
            delivered: true
        }
    );
    assert_eq!(
        harness.weather.queries(),
        vec![LocationQuery::ByName("London".to_string())]
    );

    let sent = harness.messaging.sent();
    assert_eq!(sent.len(), 1);
    let Sent::Text(chat_id, text) = &sent[0] else {
        panic!("expected a text reply, got {sent:?}");
    };
    assert_eq!(*chat_id, 42);
    assert!(text.starts_with("Небольшой дождь.\n"));
    assert_eq!(text, LONDON_TEXT);
}

#[tokio::test]
async fn test_text_is_trimmed_before_lookup() {
    let harness = Harness::happy();

    harness
        .dispatcher
        .dispatch(&update(text_update(1, "  Санкт-Петербург \n")))
        .await;

    assert_eq!(
        harness.weather.queries(),
        vec![LocationQuery::ByName("Санкт-Петербург".to_string())]
    );
}

#[tokio::test]
async fn test_start_and_help_never_reach_weather() {
    let harness = Harness::happy();

    harness
        .dispatcher
        .dispatch(&update(text_update(5, "/start")))
        .await;
    harness
        .dispatcher
        .dispatch(&update(text_update(5, "/help")))
        .await;

    assert!(harness.weather.queries().is_empty());
    assert_eq!(
        harness.messaging.sent(),
        vec![
            Sent::Text(5, START_MESSAGE.to_string()),
            Sent::Text(5, HELP_MESSAGE.to_string()),
        ]
    );
}

#[tokio::test]
async fn test_unknown_place_echoes_name() {
    let harness = Harness::with_weather(WeatherMode::NotFound);

    let outcome = harness
        .dispatcher
        .dispatch(&update(text_update(3, "Нигдеград")))
        .await;

    assert_eq!(
        outcome,
        DispatchOutcome::Replied {
            kind: "text",
            result: "not_found",
            delivered: true
        }
    );
    assert_eq!(
        harness.messaging.sent(),
        vec![Sent::Text(
            3,
            "Я не нашел населенный пункт \"Нигдеград\".".to_string()
        )]
    );
}

#[tokio::test]
async fn test_location_lookup_by_coordinates() {
    let harness = Harness::happy();

    harness
        .dispatcher
        .dispatch(&update(location_update(9, 55.7558, 37.6173)))
        .await;

    assert_eq!(
        harness.weather.queries(),
        vec![LocationQuery::ByCoordinates {
            lat: 55.7558,
            lon: 37.6173
        }]
    );
    assert_eq!(
        harness.messaging.sent(),
        vec![Sent::Text(9, LONDON_TEXT.to_string())]
    );
}

#[tokio::test]
async fn test_unknown_coordinates_do_not_echo_numbers() {
    let harness = Harness::with_weather(WeatherMode::NotFound);

    harness
        .dispatcher
        .dispatch(&update(location_update(9, 0.0, -160.5)))
        .await;

    let sent = harness.messaging.sent();
    assert_eq!(sent, vec![Sent::Text(9, UNKNOWN_PLACE_MESSAGE.to_string())]);
    let Sent::Text(_, text) = &sent[0] else {
        unreachable!()
    };
    assert!(!text.chars().any(|c| c.is_ascii_digit()));
}

#[tokio::test]
async fn test_upstream_failure_apologises() {
    let harness = Harness::with_weather(WeatherMode::Unavailable);

    let outcome = harness
        .dispatcher
        .dispatch(&update(text_update(4, "Омск")))
        .await;

    assert_eq!(
        outcome,
        DispatchOutcome::Replied {
            kind: "text",
            result: "upstream_unavailable",
            delivered: true
        }
    );
    assert_eq!(
        harness.messaging.sent(),
        vec![Sent::Text(4, UPSTREAM_UNAVAILABLE_MESSAGE.to_string())]
    );
}

#[tokio::test]
async fn test_incomplete_observation_is_reported_not_rendered() {
    let partial = WeatherObservation {
        pressure: None,
        ..london()
    };
    let harness = Harness::with_weather(WeatherMode::Observation(partial));

    harness
        .dispatcher
        .dispatch(&update(text_update(4, "London")))
        .await;

    assert_eq!(
        harness.messaging.sent(),
        vec![Sent::Text(4, UPSTREAM_UNAVAILABLE_MESSAGE.to_string())]
    );
}

#[tokio::test]
async fn test_unrecognized_message_lists_capabilities() {
    let harness = Harness::happy();
    let sticker = serde_json::json!({
        "update_id": 7,
        "message": {
            "message_id": 1,
            "chat": {"id": 8, "type": "private"},
            "sticker": {"file_id": "CAACAgIAAxkBAAE"}
        }
    });

    let outcome = harness.dispatcher.dispatch(&update(sticker)).await;

    assert_eq!(
        outcome,
        DispatchOutcome::Replied {
            kind: "unrecognized",
            result: "unrecognized",
            delivered: true
        }
    );
    assert_eq!(
        harness.messaging.sent(),
        vec![Sent::Text(8, CAPABILITIES_MESSAGE.to_string())]
    );
    assert!(harness.no_gateway_calls());
}

#[tokio::test]
async fn test_update_without_message_is_ignored() {
    let harness = Harness::happy();
    let edited = serde_json::json!({
        "update_id": 8,
        "edited_message": {"message_id": 1, "chat": {"id": 8}, "text": "Омск"}
    });

    let outcome = harness.dispatcher.dispatch(&update(edited)).await;

    assert_eq!(outcome, DispatchOutcome::Ignored);
    assert!(harness.messaging.sent().is_empty());
    assert!(harness.no_gateway_calls());
}

#[tokio::test]
async fn test_voice_reply_is_synthesized_forecast() {
    let harness = Harness::happy();

    let outcome = harness
        .dispatcher
        .dispatch(&update(voice_update(6, 4)))
        .await;

    assert_eq!(
        outcome,
        DispatchOutcome::Replied {
            kind: "voice",
            result: "ok",
            delivered: true
        }
    );
    assert_eq!(harness.messaging.fetched(), vec!["AwACAgIAAxkBAAI".to_string()]);
    assert_eq!(harness.speech.transcribed(), vec![b"OggS-voice".to_vec()]);
    assert_eq!(
        harness.weather.queries(),
        vec![LocationQuery::ByName("Москва".to_string())]
    );
    assert_eq!(
        harness.speech.synthesized(),
        vec![LONDON_VOICE_SCRIPT.to_string()]
    );
    assert_eq!(
        harness.messaging.sent(),
        vec![Sent::Voice(
            6,
            format!("audio:{LONDON_VOICE_SCRIPT}").into_bytes()
        )]
    );
}

#[tokio::test]
async fn test_voice_at_limit_is_accepted() {
    let harness = Harness::happy();

    harness
        .dispatcher
        .dispatch(&update(voice_update(6, 30)))
        .await;

    assert_eq!(harness.messaging.fetched().len(), 1);
}

#[tokio::test]
async fn test_long_voice_is_rejected_before_any_gateway_call() {
    let harness = Harness::happy();

    let outcome = harness
        .dispatcher
        .dispatch(&update(voice_update(6, 31)))
        .await;

    assert_eq!(
        outcome,
        DispatchOutcome::Replied {
            kind: "voice",
            result: "voice_too_long",
            delivered: true
        }
    );
    assert!(harness.no_gateway_calls());
    assert_eq!(
        harness.messaging.sent(),
        vec![Sent::Text(
            6,
            "Я могу обрабатывать голосовые сообщения не длиннее 30 секунд".to_string()
        )]
    );
}

#[tokio::test]
async fn test_voice_file_unavailable() {
    let harness = Harness::new(
        RecordingMessaging {
            file_missing: true,
            ..Default::default()
        },
        WeatherMode::Observation(london()),
        FakeSpeech::new(Some("Москва")),
    );

    harness
        .dispatcher
        .dispatch(&update(voice_update(6, 3)))
        .await;

    assert!(harness.speech.transcribed().is_empty());
    assert_eq!(
        harness.messaging.sent(),
        vec![Sent::Text(6, FILE_UNAVAILABLE_MESSAGE.to_string())]
    );
}

#[tokio::test]
async fn test_unrecognized_speech() {
    let harness = Harness::new(
        RecordingMessaging::default(),
        WeatherMode::Observation(london()),
        FakeSpeech::new(None),
    );

    harness
        .dispatcher
        .dispatch(&update(voice_update(6, 3)))
        .await;

    assert!(harness.weather.queries().is_empty());
    assert_eq!(
        harness.messaging.sent(),
        vec![Sent::Text(6, TRANSCRIPTION_FAILED_MESSAGE.to_string())]
    );
}

#[tokio::test]
async fn test_voice_unknown_place_is_spoken() {
    let harness = Harness::with_weather(WeatherMode::NotFound);

    harness
        .dispatcher
        .dispatch(&update(voice_update(6, 3)))
        .await;

    let expected = "Я не нашел населенный пункт \"Москва\".";
    assert_eq!(harness.speech.synthesized(), vec![expected.to_string()]);
    assert_eq!(
        harness.messaging.sent(),
        vec![Sent::Voice(6, format!("audio:{expected}").into_bytes())]
    );
}

#[tokio::test]
async fn test_synthesis_failure_sends_single_apology() {
    let mut speech = FakeSpeech::new(Some("Москва"));
    speech.synthesis_fails = true;
    let harness = Harness::new(
        RecordingMessaging::default(),
        WeatherMode::Observation(london()),
        speech,
    );

    let outcome = harness
        .dispatcher
        .dispatch(&update(voice_update(6, 3)))
        .await;

    assert_eq!(
        outcome,
        DispatchOutcome::Replied {
            kind: "voice",
            result: "synthesis_failed",
            delivered: true
        }
    );
    assert_eq!(
        harness.messaging.sent(),
        vec![Sent::Text(6, SYNTHESIS_FAILED_MESSAGE.to_string())]
    );
}

#[tokio::test]
async fn test_send_failure_is_swallowed() {
    let harness = Harness::new(
        RecordingMessaging {
            send_fails: true,
            ..Default::default()
        },
        WeatherMode::Observation(london()),
        FakeSpeech::new(Some("Москва")),
    );

    let outcome = harness
        .dispatcher
        .dispatch(&update(text_update(2, "London")))
        .await;

    assert_eq!(
        outcome,
        DispatchOutcome::Replied {
            kind: "text",
            result: "ok",
            delivered: false
        }
    );
    // no retry and no second reply
    assert_eq!(harness.messaging.sent().len(), 1);
}
