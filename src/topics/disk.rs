//! Disk seek physics topic
//!
//! Why random I/O on spinning disks is slow: seek time plus rotational
//! latency, and what RPM does (and doesn't) buy you.

use crate::topic::{
    Application, KernelKind, ParamSpec, PredictionOption, PredictionSet, Question, QuestionOption,
    TopicConfig,
};

fn q(id: &str, scenario: &str, prompt: &str, options: [(&str, &str, bool); 4], explanation: &str) -> Question {
    Question {
        id: id.to_owned(),
        scenario: scenario.to_owned(),
        prompt: prompt.to_owned(),
        options: options
            .iter()
            .map(|(id, label, correct)| QuestionOption {
                id: (*id).to_owned(),
                label: (*label).to_owned(),
                is_correct: *correct,
            })
            .collect(),
        explanation: explanation.to_owned(),
    }
}

/// Build the disk seek topic
pub fn topic() -> TopicConfig {
    TopicConfig {
        id: "disk-seek".to_owned(),
        title: "Disk Seek Physics".to_owned(),
        labels: super::labels([
            "The Spinning Platter",
            "Make a Prediction",
            "Drive the Head",
            "What Just Happened",
            "The Sequential Twist",
            "Streaming vs Seeking",
            "Why Streaming Wins",
            "Where This Shows Up",
            "Check Your Understanding",
            "Mastered",
        ]),
        predict: PredictionSet {
            prompt: "A 7200 RPM drive doubles its spindle speed to 14400 RPM. \
                     What happens to total random access time?"
                .to_owned(),
            options: vec![
                PredictionOption {
                    id: "halves".to_owned(),
                    label: "It halves - twice the speed, half the time".to_owned(),
                },
                PredictionOption {
                    id: "improves_some".to_owned(),
                    label: "It improves, but by less than half".to_owned(),
                },
                PredictionOption {
                    id: "unchanged".to_owned(),
                    label: "It stays the same - seeks dominate".to_owned(),
                },
            ],
            correct: "improves_some".to_owned(),
        },
        twist_predict: PredictionSet {
            prompt: "The same drive now reads blocks laid out one after another \
                     on the same track. How does access time compare to random reads?"
                .to_owned(),
            options: vec![
                PredictionOption {
                    id: "same".to_owned(),
                    label: "About the same - the platter spins either way".to_owned(),
                },
                PredictionOption {
                    id: "somewhat_faster".to_owned(),
                    label: "A little faster - maybe 2x".to_owned(),
                },
                PredictionOption {
                    id: "much_faster".to_owned(),
                    label: "Dramatically faster - 10x or more".to_owned(),
                },
            ],
            correct: "much_faster".to_owned(),
        },
        kernel: KernelKind::AccessLatency,
        params: vec![
            ParamSpec::new("rpm", 4200.0, 15_000.0, 100.0, 7200.0),
            ParamSpec::new("sequential", 0.0, 1.0, 1.0, 0.0),
            ParamSpec::new("target_track", 0.0, 100.0, 1.0, 0.0),
        ],
        questions: vec![
            q(
                "rotational-latency",
                "A platter spins at 7200 RPM.",
                "On average, how long does the drive wait for a sector to rotate under the head?",
                [
                    ("a", "About 4.2 ms - half a revolution", true),
                    ("b", "About 8.3 ms - a full revolution", false),
                    ("c", "About 1 ms - a quarter revolution", false),
                    ("d", "Effectively zero", false),
                ],
                "One revolution at 7200 RPM takes 60/7200 s = 8.33 ms. On average \
                 the target sector is half a revolution away: 4.17 ms.",
            ),
            q(
                "seek-definition",
                "The head assembly moves between tracks.",
                "Which component of access time does that movement contribute?",
                [
                    ("a", "Rotational latency", false),
                    ("b", "Seek time", true),
                    ("c", "Transfer time", false),
                    ("d", "Controller overhead", false),
                ],
                "Seek time is the mechanical repositioning of the arm across \
                 tracks; rotation is a separate, additive wait.",
            ),
            q(
                "iops-inverse",
                "A drive's total random access time is 12.5 ms.",
                "Roughly how many random operations can it serve per second?",
                [
                    ("a", "About 8", false),
                    ("b", "About 80", true),
                    ("c", "About 800", false),
                    ("d", "About 8000", false),
                ],
                "IOPS is the reciprocal of access time: 1000 ms / 12.5 ms = 80.",
            ),
            q(
                "rpm-doubling",
                "Spindle speed doubles while the seek profile stays fixed.",
                "Why doesn't random access time halve?",
                [
                    ("a", "The head also has to move, and seeks don't speed up", true),
                    ("b", "The platter wobbles more at high speed", false),
                    ("c", "The controller becomes the bottleneck", false),
                    ("d", "It does halve", false),
                ],
                "Only the rotational component shrinks with RPM. The seek \
                 component is set by arm mechanics and dominates what's left.",
            ),
            q(
                "sequential-win",
                "Blocks are read in the order they are laid out on a track.",
                "What makes sequential access so much faster than random access?",
                [
                    ("a", "The drive raises its spindle speed", false),
                    ("b", "Almost no head movement and no per-block rotational wait", true),
                    ("c", "Data compresses better when contiguous", false),
                    ("d", "The OS skips the filesystem layer", false),
                ],
                "Once the head is on track, data streams under it continuously; \
                 both seek and rotational waits drop out per block.",
            ),
            q(
                "ssd-contrast",
                "An SSD replaces the spinning drive.",
                "Which cost disappears entirely?",
                [
                    ("a", "Mechanical seek and rotational latency", true),
                    ("b", "Transfer time", false),
                    ("c", "Queueing delay", false),
                    ("d", "Wear from repeated reads", false),
                ],
                "Flash has no moving parts, so the mechanical components of \
                 access time simply don't exist.",
            ),
            q(
                "average-half-rev",
                "Access-time formulas use half a revolution for the rotational term.",
                "Why half?",
                [
                    ("a", "Drives read both platter sides at once", false),
                    ("b", "The target sector is uniformly distributed around the track", true),
                    ("c", "The head parks at the track midpoint", false),
                    ("d", "It's a safety margin", false),
                ],
                "The sector could be anywhere from 0 to a full revolution away; \
                 the expected wait is the midpoint.",
            ),
            q(
                "elevator-order",
                "A database reorders pending disk requests by track position.",
                "What is it minimizing?",
                [
                    ("a", "Rotational latency", false),
                    ("b", "Total seek distance", true),
                    ("c", "Transfer time", false),
                    ("d", "Queue length", false),
                ],
                "Elevator scheduling sweeps the arm across tracks in order, \
                 cutting the dominant seek component.",
            ),
            q(
                "fifteen-k",
                "Enterprise drives ran at 15000 RPM.",
                "What rotational latency did that buy?",
                [
                    ("a", "4.2 ms average", false),
                    ("b", "2 ms average", true),
                    ("c", "0.2 ms average", false),
                    ("d", "None - RPM doesn't affect it", false),
                ],
                "60/15000 s = 4 ms per revolution, so 2 ms average - half the \
                 wait of a 7200 RPM drive.",
            ),
            q(
                "workload-design",
                "A log-structured storage engine turns random writes into appends.",
                "Which property of disks is it exploiting?",
                [
                    ("a", "Sequential access is an order of magnitude cheaper", true),
                    ("b", "Appends skip the write cache", false),
                    ("c", "Outer tracks hold more data", false),
                    ("d", "Writes are faster than reads", false),
                ],
                "Append-only layouts pay the seek once and stream after, which \
                 is exactly where spinning media is fast.",
            ),
        ],
        applications: vec![
            Application {
                title: "Database B-trees".to_owned(),
                description: "Page-oriented storage keeps related keys adjacent so \
                              a range scan seeks once and streams the rest."
                    .to_owned(),
                stats: vec![
                    "~80 IOPS random vs ~150 MB/s sequential on one spindle".to_owned(),
                    "Fill-factor tuning trades space for locality".to_owned(),
                ],
            },
            Application {
                title: "Log-structured merge trees".to_owned(),
                description: "LSM engines buffer writes in memory and flush them as \
                              sorted runs, converting random writes to appends."
                    .to_owned(),
                stats: vec![
                    "Write amplification traded for pure-sequential flushes".to_owned(),
                ],
            },
            Application {
                title: "Video surveillance recorders".to_owned(),
                description: "DVRs write many camera streams as large interleaved \
                              extents sized so the head services each stream in turn."
                    .to_owned(),
                stats: vec!["Dozens of 4-8 Mbps streams on a single 5400 RPM disk".to_owned()],
            },
            Application {
                title: "Defragmentation".to_owned(),
                description: "Consolidating a file's blocks restores sequential \
                              layout, collapsing per-read seeks back to one."
                    .to_owned(),
                stats: vec!["Badly fragmented reads can be 50x slower".to_owned()],
            },
        ],
        pass_threshold: 7,
    }
}
