use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use crate::Database;

struct DemoMessage {
    channel: &'static str,
    user: &'static str,
    text: &'static str,
    age: Duration,
    pinned: bool,
}

fn demo_messages() -> [DemoMessage; 8] {
    [
        DemoMessage {
            channel: "general",
            user: "Maya",
            text: "Decision: hotfire checklist ownership moves to Ops for launch week.",
            age: Duration::hours(3),
            pinned: true,
        },
        DemoMessage {
            channel: "propulsion",
            user: "Ari",
            text: "We resolved injector anomaly by switching to rev-C manifold. Document update pending.",
            age: Duration::hours(22),
            pinned: true,
        },
        DemoMessage {
            channel: "guidance",
            user: "Noah",
            text: "Who owns Monte Carlo reruns? I can cover this sprint but need backup.",
            age: Duration::hours(32),
            pinned: false,
        },
        DemoMessage {
            channel: "general",
            user: "Lena",
            text: "Final call: avionics thermal tests are due Thursday 4 PM, owner is Lena.",
            age: Duration::hours(26),
            pinned: true,
        },
        DemoMessage {
            channel: "ops",
            user: "Sam",
            text: "Cross-team note: product asked same staging telemetry question last week.",
            age: Duration::hours(2),
            pinned: false,
        },
        DemoMessage {
            channel: "propulsion",
            user: "Maya",
            text: "Clarification: tank pressure limits unchanged, only sensor calibration offsets changed.",
            age: Duration::hours(8),
            pinned: false,
        },
        DemoMessage {
            channel: "guidance",
            user: "Noah",
            text: "Decision made: Priya owns guidance fault-tree signoff.",
            age: Duration::minutes(30),
            pinned: true,
        },
        DemoMessage {
            channel: "ops",
            user: "Priya",
            text: "If asked about launch rehearsal runbook, reference the Jan 12 thread summary in #ops.",
            age: Duration::minutes(120),
            pinned: false,
        },
    ]
}

/// Fill an empty store with the launch-week demo conversation, timestamped
/// relative to `now`. Returns how many messages were inserted; a store that
/// already has messages is left alone.
pub fn seed_demo(db: &Database, now: DateTime<Utc>) -> Result<usize> {
    if db.message_count()? > 0 {
        return Ok(0);
    }

    let demo = demo_messages();
    for m in &demo {
        db.insert_message(m.channel, m.user, m.text, m.pinned, now - m.age)?;
    }

    info!("Seeded {} demo messages", demo.len());
    Ok(demo.len())
}
