//! Built-in demo sentences and reference voices.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoKind {
    Normal,
    CodeMix,
}

impl DemoKind {
    pub fn label(self) -> &'static str {
        match self {
            DemoKind::Normal => "Normal",
            DemoKind::CodeMix => "Code-Mix",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Demo {
    pub title: &'static str,
    /// English or transliterated, for display
    pub display_text: &'static str,
    /// Native script, sent to the service
    pub actual_text: &'static str,
    pub kind: DemoKind,
}

#[derive(Debug, Clone, Copy)]
pub struct LanguageDemo {
    pub id: &'static str,
    pub name: &'static str,
    pub script_label: &'static str,
    pub demos: &'static [Demo],
}

/// A bundled reference voice
#[derive(Debug, Clone, Copy)]
pub struct VoicePreset {
    pub language_id: &'static str,
    pub name: &'static str,
    pub audio_path: &'static str,
    pub ref_text: &'static str,
}

pub const LANGUAGE_DEMOS: &[LanguageDemo] = &[
    LanguageDemo {
        id: "en",
        name: "English",
        script_label: "English",
        demos: &[
            Demo {
                title: "Standard English",
                display_text: "BharatGen is building AI for Indian languages.",
                actual_text: "BharatGen is building AI for Indian languages.",
                kind: DemoKind::Normal,
            },
            Demo {
                title: "Product Vision",
                display_text: "Voice cloning that feels natural and fast.",
                actual_text: "Voice cloning that feels natural and fast.",
                kind: DemoKind::Normal,
            },
        ],
    },
    LanguageDemo {
        id: "hi",
        name: "Hindi",
        script_label: "हिन्दी",
        demos: &[
            Demo {
                title: "Standard Hindi",
                display_text: "BharatGen is building AI for Indian languages.",
                actual_text: "भारतजेन भारतीय भाषाओं के लिए एआई बना रहा है।",
                kind: DemoKind::Normal,
            },
            Demo {
                title: "Code-Mixed Hindi",
                display_text: "India's diversity, AI's power.",
                actual_text: "भारत की विविधता, एआई की ताकत।",
                kind: DemoKind::CodeMix,
            },
        ],
    },
    LanguageDemo {
        id: "mr",
        name: "Marathi",
        script_label: "मराठी",
        demos: &[
            Demo {
                title: "Standard Marathi",
                display_text: "Our language is not just words, it is our identity.",
                actual_text: "आपली भाषा म्हणजे केवळ शब्द नाहीत, ती आपली ओळख आहे.",
                kind: DemoKind::Normal,
            },
            Demo {
                title: "Code-Mixed Marathi",
                display_text: "AI speaking in our language.",
                actual_text: "आपल्या भाषेत बोलणारी एआय.",
                kind: DemoKind::CodeMix,
            },
        ],
    },
    LanguageDemo {
        id: "gu",
        name: "Gujarati",
        script_label: "ગુજરાતી",
        demos: &[
            Demo {
                title: "Standard Gujarati",
                display_text: "BharatGen puts Indian languages at the center of AI.",
                actual_text: "ભારતજેન ભારતીય ભાષાઓને એઆઈના કેન્દ્રમાં મૂકે છે.",
                kind: DemoKind::Normal,
            },
            Demo {
                title: "Code-Mixed Gujarati",
                display_text: "Building AI with Indian Languages is a future-ready idea.",
                actual_text: "ઇન્ડિયન લેન્ગ્વેજિસ સાથે એઆઈ બનાવવું એ ફ્યુચર-રેડી વિચાર છે.",
                kind: DemoKind::CodeMix,
            },
        ],
    },
    LanguageDemo {
        id: "bn",
        name: "Bengali",
        script_label: "বাংলা",
        demos: &[
            Demo {
                title: "Standard Bengali",
                display_text: "India's identity lives in its languages.",
                actual_text: "ভারতের পরিচয় তার ভাষার মধ্যেই বেঁচে থাকে।",
                kind: DemoKind::Normal,
            },
            Demo {
                title: "Tech Focus",
                display_text: "Technology works best when built on language.",
                actual_text: "ভাষার উপর ভিত্তি করে তৈরি করা প্রযুক্তি সবার জন্য বেশি কার্যকর।",
                kind: DemoKind::Normal,
            },
        ],
    },
    LanguageDemo {
        id: "ta",
        name: "Tamil",
        script_label: "தமிழ்",
        demos: &[Demo {
            title: "Standard Tamil",
            display_text: "Since the weather was pleasant today, the evening walk was very enjoyable.",
            actual_text: "இன்று வானிலை இனிமையாக இருந்ததால், மாலை நேர நடைப்பயணம் மிகவும் மகிழ்ச்சியாக இருந்தது.",
            kind: DemoKind::Normal,
        }],
    },
];

pub const VOICE_PRESETS: &[VoicePreset] = &[
    VoicePreset {
        language_id: "hi",
        name: "Hindi",
        audio_path: "voices/voice-hi.wav",
        ref_text: "हम जल्द से जल्द इस समस्या का समाधान करेंगे।",
    },
    VoicePreset {
        language_id: "bn",
        name: "Bengali",
        audio_path: "voices/voice-bn.wav",
        ref_text: "তাতে অবশ্য ভড়ং ভণ্ডামি আর দুর্নীতির শেষ নেই",
    },
    VoicePreset {
        language_id: "ta",
        name: "Tamil",
        audio_path: "voices/voice-ta.wav",
        ref_text: "சென்னை சென்ட்ரல் விஜயவாடா ஜன் சதாப்தி எக்ஸ்பிரஸ்",
    },
    VoicePreset {
        language_id: "mr",
        name: "Marathi",
        audio_path: "voices/voice-mr.wav",
        ref_text: "यासाठी एखादं टूर पॅकेज सुचवाल का?",
    },
    VoicePreset {
        language_id: "en",
        name: "English",
        audio_path: "voices/voice-en.wav",
        ref_text: "Some call me nature, others call me mother nature.",
    },
];

pub fn language(id: &str) -> Option<&'static LanguageDemo> {
    LANGUAGE_DEMOS.iter().find(|l| l.id == id)
}

pub fn voice_preset(language_id: &str) -> Option<&'static VoicePreset> {
    VOICE_PRESETS.iter().find(|v| v.language_id == language_id)
}

/// Demo `index` (0-based) of `language_id`
pub fn demo(language_id: &str, index: usize) -> Option<&'static Demo> {
    language(language_id).and_then(|l| l.demos.get(index))
}

/// Print the table for the `demos` subcommand
pub fn print_table() {
    for lang in LANGUAGE_DEMOS {
        let voice = if voice_preset(lang.id).is_some() {
            " [voice preset]"
        } else {
            ""
        };
        println!("{} ({}) - {}{}", lang.name, lang.id, lang.script_label, voice);
        for (i, demo) in lang.demos.iter().enumerate() {
            println!(
                "  {}. {} [{}]\n     {}\n     {}",
                i + 1,
                demo.title,
                demo.kind.label(),
                demo.display_text,
                demo.actual_text
            );
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_language_has_demos() {
        for lang in LANGUAGE_DEMOS {
            assert!(!lang.demos.is_empty(), "{} has no demos", lang.id);
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(language("hi").unwrap().name, "Hindi");
        assert!(language("xx").is_none());
        assert_eq!(demo("hi", 1).unwrap().kind, DemoKind::CodeMix);
        assert!(demo("ta", 5).is_none());
        assert_eq!(voice_preset("en").unwrap().audio_path, "voices/voice-en.wav");
    }

    #[test]
    fn test_english_texts_match_display() {
        for demo in language("en").unwrap().demos {
            assert_eq!(demo.display_text, demo.actual_text);
        }
    }
}
