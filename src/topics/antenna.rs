//! Antenna gain topic
//!
//! Aperture, wavelength, and why a bigger dish hears better but points
//! harder.

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

/// Build the antenna gain topic
pub fn topic() -> TopicConfig {
    TopicConfig {
        id: "antenna-gain".to_owned(),
        title: "Antenna Gain".to_owned(),
        labels: super::labels([
            "The Distant Whisper",
            "Make a Prediction",
            "Size the Dish",
            "What Just Happened",
            "The Pointing Twist",
            "Walk Off Boresight",
            "Why Beams Are Narrow",
            "Where This Shows Up",
            "Check Your Understanding",
            "Mastered",
        ]),
        predict: PredictionSet {
            prompt: "You double a dish antenna's diameter at the same frequency. \
                     What happens to its gain?"
                .to_owned(),
            options: vec![
                PredictionOption {
                    id: "double".to_owned(),
                    label: "Doubles - twice the dish, twice the signal".to_owned(),
                },
                PredictionOption {
                    id: "quadruple".to_owned(),
                    label: "Quadruples - gain follows collecting area".to_owned(),
                },
                PredictionOption {
                    id: "same".to_owned(),
                    label: "Unchanged - gain depends only on frequency".to_owned(),
                },
            ],
            correct: "quadruple".to_owned(),
        },
        twist_predict: PredictionSet {
            prompt: "That bigger dish now has far more gain. What happened to the \
                     width of its beam?"
                .to_owned(),
            options: vec![
                PredictionOption {
                    id: "wider".to_owned(),
                    label: "Wider - more gain covers more sky".to_owned(),
                },
                PredictionOption {
                    id: "narrower".to_owned(),
                    label: "Narrower - the gain is bought by focusing".to_owned(),
                },
                PredictionOption {
                    id: "unchanged".to_owned(),
                    label: "Unchanged - beamwidth is set by the feed".to_owned(),
                },
            ],
            correct: "narrower".to_owned(),
        },
        kernel: KernelKind::AntennaGain,
        params: vec![
            ParamSpec::new("diameter_m", 0.5, 30.0, 0.1, 3.0),
            ParamSpec::new("frequency_ghz", 1.0, 40.0, 0.5, 12.0),
            ParamSpec::new("efficiency", 0.35, 0.8, 0.05, 0.6),
            ParamSpec::new("offaxis_deg", 0.0, 10.0, 0.1, 0.0),
        ],
        questions: vec![
            q(
                "gain-area",
                "Dish gain is (pi D / lambda)^2 times efficiency.",
                "Doubling the diameter adds how many dB?",
                [
                    ("a", "About 3 dB", false),
                    ("b", "About 6 dB", true),
                    ("c", "About 10 dB", false),
                    ("d", "About 12 dB", false),
                ],
                "Gain scales with diameter squared: 4x in linear terms, \
                 10·log10(4) = 6.02 dB.",
            ),
            q(
                "wavelength",
                "A link runs at 12 GHz.",
                "Roughly what is the wavelength?",
                [
                    ("a", "2.5 m", false),
                    ("b", "25 cm", false),
                    ("c", "2.5 cm", true),
                    ("d", "2.5 mm", false),
                ],
                "lambda = c/f = 3e8 / 12e9 = 0.025 m.",
            ),
            q(
                "beamwidth",
                "Beamwidth is about 70 / (D/lambda) degrees.",
                "A 120-wavelength dish has a half-power beamwidth near:",
                [
                    ("a", "6 degrees", false),
                    ("b", "0.6 degrees", true),
                    ("c", "0.06 degrees", false),
                    ("d", "60 degrees", false),
                ],
                "70/120 = 0.58 degrees - narrow enough that mount rigidity \
                 becomes the engineering problem.",
            ),
            q(
                "tradeoff",
                "Gain went up 6 dB when the dish doubled.",
                "What did that gain cost?",
                [
                    ("a", "Bandwidth", false),
                    ("b", "Beamwidth - the beam narrowed by half", true),
                    ("c", "Efficiency", false),
                    ("d", "Nothing - it's free", false),
                ],
                "Gain is directivity: the same radiated power squeezed into a \
                 smaller solid angle. Narrower beam is the same fact.",
            ),
            q(
                "efficiency",
                "Real dishes quote 55-70% aperture efficiency.",
                "What does the missing fraction represent?",
                [
                    ("a", "Ohmic loss in the cable only", false),
                    ("b", "Spillover, blockage, and surface error losses", true),
                    ("c", "Atmospheric absorption", false),
                    ("d", "Regulatory margin", false),
                ],
                "The feed illuminates the dish imperfectly and the surface \
                 deviates from a true parabola; both shave the ideal gain.",
            ),
            q(
                "frequency-gain",
                "The same 3 m dish moves from 4 GHz to 12 GHz.",
                "What happens to its gain?",
                [
                    ("a", "Drops 9.5 dB", false),
                    ("b", "Rises about 9.5 dB", true),
                    ("c", "Unchanged - same dish", false),
                    ("d", "Rises 3 dB", false),
                ],
                "D/lambda triples, so gain rises 3² = 9x, about 9.5 dB - if the \
                 surface is accurate enough for the shorter wavelength.",
            ),
            q(
                "pointing",
                "A 0.6-degree beam drifts 0.3 degrees off target.",
                "Roughly how much signal is lost?",
                [
                    ("a", "None - it's still inside the beam", false),
                    ("b", "About 3 dB - that's the half-power definition", true),
                    ("c", "Everything", false),
                    ("d", "0.3 dB", false),
                ],
                "Half-power beamwidth is defined by the -3 dB points; drifting \
                 to the beam edge costs half the power.",
            ),
            q(
                "sidelobes",
                "The radiation pattern has nulls and secondary lobes off axis.",
                "What pattern shape does a uniformly illuminated aperture produce?",
                [
                    ("a", "A Gaussian with no nulls", false),
                    ("b", "A sinc-squared main lobe with sidelobes", true),
                    ("c", "A flat response over 180 degrees", false),
                    ("d", "A pure cosine", false),
                ],
                "Uniform illumination gives the classic sinc² pattern: deep \
                 nulls and ~-13 dB first sidelobes.",
            ),
            q(
                "small-dish",
                "A 0.5 m dish at 1 GHz is only 1.7 wavelengths across.",
                "Why is it a poor performer?",
                [
                    ("a", "Too few wavelengths across to focus a beam", true),
                    ("b", "Metal is too thin at that size", false),
                    ("c", "1 GHz can't reflect off parabolas", false),
                    ("d", "It isn't - size never matters", false),
                ],
                "Focusing needs an aperture many wavelengths wide; below a few \
                 wavelengths the 'beam' is nearly isotropic.",
            ),
            q(
                "link-budget",
                "A satellite link needs 6 dB more margin.",
                "Which single change supplies it?",
                [
                    ("a", "Doubling the ground dish diameter", true),
                    ("b", "Doubling transmit power", false),
                    ("c", "Halving the frequency", false),
                    ("d", "Pointing slightly off axis", false),
                ],
                "Doubling diameter adds 6 dB of gain. (Quadrupling transmit \
                 power also gives 6 dB, but costs four times the amplifier.)",
            ),
        ],
        applications: vec![
            Application {
                title: "Deep space network".to_owned(),
                description: "70 m dishes pull science data from probes beyond \
                              Pluto; at thousands of wavelengths across, their \
                              beams are hundredths of a degree."
                    .to_owned(),
                stats: vec!["~74 dBi at X-band, pointing to millidegrees".to_owned()],
            },
            Application {
                title: "Home satellite TV".to_owned(),
                description: "A 60 cm offset dish at Ku-band is ~24 wavelengths \
                              across - enough gain for a geostationary link with a \
                              beam wide enough to aim by hand."
                    .to_owned(),
                stats: vec!["~35 dBi, ~3 degree beam".to_owned()],
            },
            Application {
                title: "Radio astronomy interferometers".to_owned(),
                description: "Arrays synthesize an aperture kilometers wide from \
                              modest dishes, buying resolution no single reflector \
                              could."
                    .to_owned(),
                stats: vec!["Resolution set by baseline, sensitivity by total area".to_owned()],
            },
            Application {
                title: "5G millimeter wave".to_owned(),
                description: "At 28 GHz, a palm-sized phased array is tens of \
                              wavelengths across and steers its pencil beam \
                              electronically between handset and mast."
                    .to_owned(),
                stats: vec!["Beam tracking at walking speed, no moving parts".to_owned()],
            },
        ],
        pass_threshold: 7,
    }
}
