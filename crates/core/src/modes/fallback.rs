//! Offline text transforms, one per non-identity mode.
//! These run when no backend is configured or a backend call fails, so they
//! must stay pure: string in, string out, no I/O. Randomness only picks
//! among stock phrasings.

use rand::Rng;

fn pick<'a>(options: &[&'a str]) -> &'a str {
    let mut rng = rand::thread_rng();
    options[rng.gen_range(0..options.len())]
}

fn replace_all(text: &str, pairs: &[(&str, &str)]) -> String {
    let mut out = text.to_string();
    for (from, to) in pairs {
        out = out.replace(from, to);
    }
    out
}

pub fn joey_diaz(text: &str) -> String {
    let starter = pick(&[
        "Listen to me,",
        "I'm telling you,",
        "Back in the day,",
        "Let me tell you something,",
    ]);
    let ender = pick(&[
        "tremendous!",
        "I'm telling you!",
        "like you read about!",
        "unbelievable stuff!",
    ]);
    format!("{starter} {} - {ender}", text.to_lowercase())
}

pub fn theo_von(text: &str) -> String {
    if text.len() > 30 {
        let phrase = pick(&[
            "bless his heart",
            "you know what I'm saying?",
            "that's wild, dude",
            "reminds me of this time in Louisiana",
            "like a possum in a prayer meeting",
            "wilder than a roadhouse on payday",
        ]);
        format!("{text}, {phrase}")
    } else {
        format!("{text}, you know what I'm saying?")
    }
}

pub fn fact_check(text: &str) -> String {
    let checks = [
        (
            "visible from space",
            "[\u{274c} Incorrect: Not visible to naked eye from space]",
        ),
        (
            "only uses 10% of brain",
            "[\u{274c} Incorrect: Humans use virtually all of their brain]",
        ),
        (
            "lightning never strikes twice",
            "[\u{274c} Incorrect: Lightning often strikes the same place repeatedly]",
        ),
        (
            "goldfish have 3-second memory",
            "[\u{274c} Incorrect: Goldfish memory lasts months, not seconds]",
        ),
        (
            "cracking knuckles causes arthritis",
            "[\u{274c} Incorrect: No evidence linking knuckle cracking to arthritis]",
        ),
    ];
    let lower = text.to_lowercase();
    for (claim, check) in checks {
        if lower.contains(claim) {
            return format!("{text} {check}");
        }
    }
    format!("{text} [\u{2713} Nothing to dispute]")
}

pub fn trivia(text: &str) -> String {
    let facts = [
        ("phone", "[Fun fact: The first mobile phone weighed 2.2 pounds!]"),
        ("coffee", "[Did you know: Coffee was originally discovered by goats in Ethiopia?]"),
        ("pizza", "[Trivia: Americans eat 3 billion pizzas per year!]"),
        ("car", "[Fun fact: The average car has over 30,000 parts!]"),
        ("computer", "[Did you know: The first computer bug was an actual moth!]"),
        ("book", "[Trivia: The smell of old books comes from vanilla-scented compounds!]"),
        ("music", "[Fun fact: Music can reduce physical pain by up to 25%!]"),
        ("water", "[Did you know: Water can exist as liquid, solid, and gas simultaneously!]"),
        ("heart", "[Trivia: Your heart beats about 100,000 times per day!]"),
        ("brain", "[Fun fact: Your brain uses 20% of your body's total energy!]"),
    ];
    let lower = text.to_lowercase();
    for (keyword, fact) in facts {
        if lower.contains(keyword) {
            return format!("{text} {fact}");
        }
    }
    let generic = pick(&[
        "[Fun fact: Honey never spoils!]",
        "[Did you know: Octopuses have three hearts?]",
        "[Trivia: Bananas are berries, but strawberries are not!]",
    ]);
    format!("{text} {generic}")
}

pub fn weed(text: &str) -> String {
    let transformed = replace_all(
        text,
        &[
            ("said", "was like"),
            ("quickly", "real quick"),
            ("suddenly", "all of a sudden, dude"),
            ("immediately", "right away, man"),
            ("carefully", "real careful like"),
            ("obviously", "totally"),
            ("definitely", "for sure"),
            ("amazing", "totally awesome"),
            ("terrible", "super bogus"),
            ("angry", "all mad and stuff"),
            ("excited", "totally stoked"),
            ("surprised", "like, whoa"),
            ("confused", "all confused and stuff"),
        ],
    );
    let lower = transformed.to_lowercase();
    if ["dude", "man", "like"].iter().any(|w| lower.contains(w)) {
        transformed
    } else if transformed.len() > 20 {
        format!("Like, {transformed}, man")
    } else {
        format!("{transformed}, dude")
    }
}

pub fn pirate(text: &str) -> String {
    let transformed = replace_all(
        text,
        &[
            (" you ", " ye "),
            (" your ", " yer "),
            ("You ", "Ye "),
            ("Your ", "Yer "),
            ("hello", "ahoy"),
            ("Hello", "Ahoy"),
            ("yes", "aye"),
            ("no ", "nay "),
        ],
    );
    let starter = pick(&["Arr!", "Ahoy!", "Avast!"]);
    let ender = pick(&["matey!", "ye scurvy dog!", "shiver me timbers!"]);
    format!("{starter} {transformed}, {ender}")
}

pub fn shakespearean(text: &str) -> String {
    let transformed = replace_all(
        text,
        &[
            (" you ", " thou "),
            (" your ", " thy "),
            ("You ", "Thou "),
            ("Your ", "Thy "),
            (" are ", " art "),
            (" is ", " doth be "),
            ("have ", "hath "),
        ],
    );
    if transformed.starts_with("Verily")
        || transformed.starts_with("Forsooth")
        || transformed.starts_with("Prithee")
    {
        transformed
    } else {
        let starter = pick(&["Verily,", "Forsooth,", "Prithee,", "Hark!"]);
        format!("{starter} {}", transformed.to_lowercase())
    }
}

pub fn narrator(text: &str) -> String {
    let starter = pick(&[
        "Here we observe",
        "In the wild,",
        "Remarkable footage reveals",
        "Nature demonstrates",
    ]);
    let ender = pick(&[
        "- truly remarkable behavior",
        "- absolutely fascinating",
        "- extraordinary to witness",
        "- magnificent creatures indeed",
    ]);
    format!("{starter} {}{ender}.", text.to_lowercase())
}
