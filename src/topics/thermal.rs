//! Thermal throttling topic
//!
//! Why a CPU slows itself down under load: dissipated power, thermal
//! resistance, and the hysteretic throttle loop.

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

/// Build the thermal throttling topic
pub fn topic() -> TopicConfig {
    TopicConfig {
        id: "thermal-throttling".to_owned(),
        title: "Thermal Throttling".to_owned(),
        labels: super::labels([
            "The Hot Chip",
            "Make a Prediction",
            "Load the Die",
            "What Just Happened",
            "The Hysteresis Twist",
            "Ride the Dead-Band",
            "Why the Band Exists",
            "Where This Shows Up",
            "Check Your Understanding",
            "Mastered",
        ]),
        predict: PredictionSet {
            prompt: "You pin a laptop CPU at 100% load with a weak cooler. After a \
                     minute, what does its clock speed look like?"
                .to_owned(),
            options: vec![
                PredictionOption {
                    id: "holds".to_owned(),
                    label: "Holds its rated boost clock indefinitely".to_owned(),
                },
                PredictionOption {
                    id: "steps_down".to_owned(),
                    label: "Drops below rated speed and stays reduced".to_owned(),
                },
                PredictionOption {
                    id: "shuts_off".to_owned(),
                    label: "The machine powers off to protect itself".to_owned(),
                },
            ],
            correct: "steps_down".to_owned(),
        },
        twist_predict: PredictionSet {
            prompt: "The throttle engages at 95 °C. The die cools to 94 °C. \
                     Does the throttle release?"
                .to_owned(),
            options: vec![
                PredictionOption {
                    id: "releases".to_owned(),
                    label: "Yes - it's below the threshold now".to_owned(),
                },
                PredictionOption {
                    id: "holds_until_lower".to_owned(),
                    label: "No - it waits until well below the threshold".to_owned(),
                },
                PredictionOption {
                    id: "random".to_owned(),
                    label: "Depends on the firmware's mood".to_owned(),
                },
            ],
            correct: "holds_until_lower".to_owned(),
        },
        kernel: KernelKind::Thermal,
        params: vec![
            ParamSpec::new("clock_ghz", 0.8, 5.0, 0.1, 3.0),
            ParamSpec::new("voltage_v", 0.8, 1.4, 0.05, 1.2),
            ParamSpec::new("workload_pct", 0.0, 100.0, 5.0, 50.0),
            ParamSpec::new("cooling_w", 40.0, 250.0, 10.0, 100.0),
        ],
        questions: vec![
            q(
                "dynamic-power",
                "Dynamic power scales with V² x f.",
                "Raising voltage from 1.0 V to 1.2 V at fixed clock multiplies dynamic power by about:",
                [
                    ("a", "1.2x", false),
                    ("b", "1.44x", true),
                    ("c", "2x", false),
                    ("d", "It doesn't change", false),
                ],
                "Power goes with the square of voltage: 1.2² = 1.44.",
            ),
            q(
                "thermal-resistance",
                "A cooler is rated by how many watts it moves per degree of rise.",
                "Halving cooling capacity does what to the steady-state temperature rise above ambient?",
                [
                    ("a", "Halves it", false),
                    ("b", "Doubles it", true),
                    ("c", "Leaves it unchanged", false),
                    ("d", "Quadruples it", false),
                ],
                "Rise = power x thermal resistance, and resistance is the \
                 inverse of cooling capacity.",
            ),
            q(
                "exponential-approach",
                "Die temperature moves toward its target a fixed fraction each tick.",
                "What shape does the temperature curve trace?",
                [
                    ("a", "A straight ramp", false),
                    ("b", "An exponential approach that flattens near the target", true),
                    ("c", "A step function", false),
                    ("d", "An oscillation", false),
                ],
                "Closing a constant fraction of the remaining gap per step is a \
                 discrete exponential decay of that gap.",
            ),
            q(
                "why-throttle",
                "The die crosses its throttle threshold.",
                "What does the chip actually reduce?",
                [
                    ("a", "Clock and voltage together", true),
                    ("b", "Only the fan curve", false),
                    ("c", "Cache size", false),
                    ("d", "Memory bandwidth only", false),
                ],
                "Dropping frequency alone helps linearly; dropping voltage with \
                 it wins the V² term too.",
            ),
            q(
                "hysteresis-why",
                "Throttle on at 95 °C, off below 85 °C.",
                "What failure does the 10-degree gap prevent?",
                [
                    ("a", "Permanent damage at 96 °C", false),
                    ("b", "Rapid on/off oscillation around a single threshold", true),
                    ("c", "Fan over-speed", false),
                    ("d", "Voltage regulator droop", false),
                ],
                "With one threshold, cooling caused by the throttle immediately \
                 un-throttles, which reheats, which throttles - flapping. The \
                 dead-band breaks the loop.",
            ),
            q(
                "dead-band-behavior",
                "While throttled, the die sits at 90 °C - inside the band.",
                "What is the throttle state?",
                [
                    ("a", "Released - 90 is below 95", false),
                    ("b", "Still engaged - release needs below 85", true),
                    ("c", "Alternating each tick", false),
                    ("d", "Undefined", false),
                ],
                "Inside the dead-band the state holds whatever it last was; \
                 that's the entire point of hysteresis.",
            ),
            q(
                "leakage",
                "Static power rises with die temperature.",
                "Why does that make overheating self-reinforcing?",
                [
                    ("a", "Hotter silicon leaks more, which adds heat", true),
                    ("b", "The fan slows down when hot", false),
                    ("c", "The scheduler adds more work", false),
                    ("d", "It doesn't - static power is constant", false),
                ],
                "Leakage current grows with temperature, so heat produces more \
                 heat until the cooler or throttle wins.",
            ),
            q(
                "critical-clamp",
                "Despite throttling, a fanless device under full load keeps heating.",
                "What is the last line of defense?",
                [
                    ("a", "A hard ceiling: clamp, then emergency shutdown", true),
                    ("b", "Overclocking through it", false),
                    ("c", "Swapping to efficiency cores only", false),
                    ("d", "Nothing - it melts", false),
                ],
                "Every design has an absolute critical temperature where the \
                 platform halts rather than cook the silicon.",
            ),
            q(
                "sustained-vs-burst",
                "A phone benchmarks fast for 30 seconds, then scores drop 40%.",
                "What happened?",
                [
                    ("a", "The battery sagged", false),
                    ("b", "Thermal mass absorbed the burst, then the throttle caught up", true),
                    ("c", "The benchmark has a bug", false),
                    ("d", "Background apps woke up", false),
                ],
                "Short bursts ride the thermal capacitance; sustained load \
                 reaches the steady state the cooler can actually hold.",
            ),
            q(
                "undervolting",
                "An enthusiast undervolts their CPU at the same clock.",
                "Why can that *increase* sustained performance?",
                [
                    ("a", "Lower V² power delays the throttle threshold", true),
                    ("b", "Lower voltage raises the critical temperature", false),
                    ("c", "It tricks the temperature sensor", false),
                    ("d", "It can't - less voltage is always slower", false),
                ],
                "Less power at the same frequency means the die stays under the \
                 throttle point longer, so average clocks end up higher.",
            ),
        ],
        applications: vec![
            Application {
                title: "Fanless laptops".to_owned(),
                description: "Passively cooled machines are designed around the \
                              throttle: short bursts at full clock, sustained work \
                              at whatever the chassis can shed."
                    .to_owned(),
                stats: vec!["Burst 15 W, sustained 7 W is a typical envelope".to_owned()],
            },
            Application {
                title: "Data-center power capping".to_owned(),
                description: "Racks enforce a power budget by throttling servers \
                              collectively - the same feedback loop, driven by a \
                              facility limit instead of a die sensor."
                    .to_owned(),
                stats: vec!["Capping saves provisioning for worst-case draw".to_owned()],
            },
            Application {
                title: "Smartphone gaming".to_owned(),
                description: "Sustained 3D load walks phones down a ladder of \
                              clock steps; thermals, not silicon, set frame rates \
                              after the first minutes."
                    .to_owned(),
                stats: vec!["Skin temperature limits bind before die limits".to_owned()],
            },
            Application {
                title: "Electric vehicle fast charging".to_owned(),
                description: "Charge rate tapers as the pack heats - hysteretic \
                              thermal management identical in shape to a CPU's."
                    .to_owned(),
                stats: vec!["Peak rate holds only for the first ~20% of charge".to_owned()],
            },
        ],
        pass_threshold: 7,
    }
}
