//! Recording fake gateways shared by the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use weather_bot::{
    DispatchSettings, LocationQuery, MessagingError, MessagingGateway, Reading, ReplyDispatcher,
    SpeechError, SpeechGateway, WeatherError, WeatherGateway, WeatherObservation,
};

/// Observation matching a typical London payload
pub fn london() -> WeatherObservation {
    WeatherObservation {
        place: Some("London".to_string()),
        country: Some("GB".to_string()),
        description: Some("небольшой дождь".to_string()),
        temperature: Reading::from_f64(11.3),
        feels_like: Reading::from_f64(10.52),
        pressure: Some(1009),
        humidity: Some(82),
        visibility: Some(10000),
        wind_speed: Reading::from_f64(5.66),
        wind_deg: Some(240),
        cloudiness: Some(75),
        sunrise: Some(1699946000),
        sunset: Some(1699978000),
    }
}

pub const LONDON_TEXT: &str = "Небольшой дождь.\n\
     Температура 11.3 ℃, ощущается как 10.52 ℃.\n\
     Атмосферное давление 757 мм рт. ст.\n\
     Влажность 82%.\n\
     Видимость 10000 метров.\n\
     Ветер 5.66 м/с, ЮЗ.\n\
     Восход солнца 10:13 МСК. Закат 19:06 МСК.";

pub const LONDON_VOICE_SCRIPT: &str = "Небольшой дождь. \
     Температура 11 градусов цельсия. \
     Ощущается как 11 градусов цельсия. \
     Давление 757 миллиметров ртутного столба. \
     Влажность 82 процентов.";

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text(i64, String),
    Voice(i64, Vec<u8>),
}

/// Messaging gateway that records every call
#[derive(Default)]
pub struct RecordingMessaging {
    pub sent: Mutex<Vec<Sent>>,
    pub fetched: Mutex<Vec<String>>,
    pub file_missing: bool,
    pub send_fails: bool,
}

impl RecordingMessaging {
    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessagingGateway for RecordingMessaging {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), MessagingError> {
        self.sent
            .lock()
            .unwrap()
            .push(Sent::Text(chat_id, text.to_string()));
        if self.send_fails {
            return Err(MessagingError::Api("Forbidden: bot was blocked by the user".into()));
        }
        Ok(())
    }

    async fn send_voice(&self, chat_id: i64, audio: Vec<u8>) -> Result<(), MessagingError> {
        self.sent.lock().unwrap().push(Sent::Voice(chat_id, audio));
        if self.send_fails {
            return Err(MessagingError::Api("Forbidden: bot was blocked by the user".into()));
        }
        Ok(())
    }

    async fn fetch_file(&self, file_id: &str) -> Result<Vec<u8>, MessagingError> {
        self.fetched.lock().unwrap().push(file_id.to_string());
        if self.file_missing {
            return Err(MessagingError::Api("Bad Request: invalid file_id".into()));
        }
        Ok(b"OggS-voice".to_vec())
    }
}

/// How the fake weather gateway answers
#[derive(Debug, Clone)]
pub enum WeatherMode {
    Observation(WeatherObservation),
    NotFound,
    Unavailable,
}

pub struct FakeWeather {
    pub mode: WeatherMode,
    pub queries: Mutex<Vec<LocationQuery>>,
}

impl FakeWeather {
    pub fn new(mode: WeatherMode) -> Self {
        Self {
            mode,
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn queries(&self) -> Vec<LocationQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherGateway for FakeWeather {
    async fn fetch_current(
        &self,
        query: &LocationQuery,
    ) -> Result<WeatherObservation, WeatherError> {
        self.queries.lock().unwrap().push(query.clone());
        match &self.mode {
            WeatherMode::Observation(observation) => Ok(observation.clone()),
            WeatherMode::NotFound => Err(WeatherError::NotFound),
            WeatherMode::Unavailable => Err(WeatherError::Status(502)),
        }
    }
}

/// Speech gateway answering with a fixed transcript
pub struct FakeSpeech {
    /// `None` means the audio was not recognized
    pub transcript: Option<String>,
    pub synthesis_fails: bool,
    pub transcribed: Mutex<Vec<Vec<u8>>>,
    pub synthesized: Mutex<Vec<String>>,
}

impl FakeSpeech {
    pub fn new(transcript: Option<&str>) -> Self {
        Self {
            transcript: transcript.map(str::to_string),
            synthesis_fails: false,
            transcribed: Mutex::new(Vec::new()),
            synthesized: Mutex::new(Vec::new()),
        }
    }

    pub fn transcribed(&self) -> Vec<Vec<u8>> {
        self.transcribed.lock().unwrap().clone()
    }

    pub fn synthesized(&self) -> Vec<String> {
        self.synthesized.lock().unwrap().clone()
    }
}

#[async_trait]
impl SpeechGateway for FakeSpeech {
    async fn transcribe(&self, audio: Vec<u8>) -> Result<String, SpeechError> {
        self.transcribed.lock().unwrap().push(audio);
        self.transcript.clone().ok_or(SpeechError::Unrecognized)
    }

    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError> {
        self.synthesized.lock().unwrap().push(text.to_string());
        if self.synthesis_fails {
            return Err(SpeechError::Status(500));
        }
        Ok(format!("audio:{text}").into_bytes())
    }
}

/// Fakes plus a dispatcher wired to them
pub struct Harness {
    pub messaging: Arc<RecordingMessaging>,
    pub weather: Arc<FakeWeather>,
    pub speech: Arc<FakeSpeech>,
    pub dispatcher: ReplyDispatcher,
}

impl Harness {
    pub fn new(messaging: RecordingMessaging, weather: WeatherMode, speech: FakeSpeech) -> Self {
        let messaging = Arc::new(messaging);
        let weather = Arc::new(FakeWeather::new(weather));
        let speech = Arc::new(speech);

        let dispatcher = ReplyDispatcher::new(
            messaging.clone(),
            weather.clone(),
            speech.clone(),
            DispatchSettings::default(),
        );

        Self {
            messaging,
            weather,
            speech,
            dispatcher,
        }
    }

    /// London weather, Moscow transcript, nothing failing
    pub fn happy() -> Self {
        Self::new(
            RecordingMessaging::default(),
            WeatherMode::Observation(london()),
            FakeSpeech::new(Some("Москва")),
        )
    }

    pub fn with_weather(mode: WeatherMode) -> Self {
        Self::new(
            RecordingMessaging::default(),
            mode,
            FakeSpeech::new(Some("Москва")),
        )
    }

    pub fn no_gateway_calls(&self) -> bool {
        self.messaging.fetched().is_empty()
            && self.weather.queries().is_empty()
            && self.speech.transcribed().is_empty()
            && self.speech.synthesized().is_empty()
    }
}

pub fn text_update(chat_id: i64, text: &str) -> serde_json::Value {
    serde_json::json!({
        "update_id": 1,
        "message": {
            "message_id": 10,
            "date": 1700000000,
            "chat": {"id": chat_id, "type": "private"},
            "text": text
        }
    })
}

pub fn voice_update(chat_id: i64, duration: u32) -> serde_json::Value {
    serde_json::json!({
        "update_id": 2,
        "message": {
            "message_id": 11,
            "date": 1700000000,
            "chat": {"id": chat_id, "type": "private"},
            "voice": {"file_id": "AwACAgIAAxkBAAI", "file_unique_id": "AgAD", "duration": duration, "mime_type": "audio/ogg"}
        }
    })
}

pub fn location_update(chat_id: i64, latitude: f64, longitude: f64) -> serde_json::Value {
    serde_json::json!({
        "update_id": 3,
        "message": {
            "message_id": 12,
            "date": 1700000000,
            "chat": {"id": chat_id, "type": "private"},
            "location": {"latitude": latitude, "longitude": longitude}
        }
    })
}
