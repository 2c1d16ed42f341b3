//! End-to-end test: controller events published as JSON.

use crate::mock_hw::{ManualClock, MockPanel, MockStation};

use pumpstation::adapters::notify::PublishSink;
use pumpstation::app::ports::Clock;
use pumpstation::app::service::StationService;
use pumpstation::config::{CHECK_INTERVAL_MS, StationConfig, VALVE_TRANSITION_TIMEOUT_MS};

#[test]
fn leak_close_is_published_with_reason() {
    let mut published: Vec<String> = Vec::new();
    {
        let publish = |_: &str, payload: &[u8]| -> anyhow::Result<()> {
            published.push(String::from_utf8(payload.to_vec())?);
            Ok(())
        };
        let mut sink = PublishSink::new("station/events", publish);
        let mut station = StationService::new(StationConfig::default()).unwrap();
        let clock = ManualClock::default();
        let mut hw = MockStation::new();
        let mut panel = MockPanel::new();

        let bring_up = 2 * VALVE_TRANSITION_TIMEOUT_MS + 2 * CHECK_INTERVAL_MS;
        while clock.now() < bring_up {
            station.poll(&clock, &mut hw, &mut panel, &mut sink);
            clock.advance(100);
        }
        assert!(hw.pump);

        hw.leak_analog = 4_095;
        for _ in 0..20 {
            station.poll(&clock, &mut hw, &mut panel, &mut sink);
            clock.advance(100);
        }
        sink.publish_status(&station.status());
        assert_eq!(sink.failures(), 0);
    }

    assert_eq!(published[0], r#"{"event":"started","state":"Initializing"}"#);
    assert!(published.contains(
        &r#"{"event":"valve_changed","from":"Opened","to":"Closing","reason":"leak"}"#.to_owned()
    ));
    assert!(published.iter().any(|p| p.starts_with(r#"{"event":"fault_detected""#)));
    let status = published.last().unwrap();
    assert!(status.contains(r#""state":"Transitioning""#));
    assert!(status.contains(r#""alarm_sounding":true"#));
    assert!(!status.contains(r#""polls":0}"#));
}
