//! Bundled course content used when the backend cannot be reached.

use crate::content::{Chapter, Exercise, TopicSummary};

const PLACEHOLDER_STARTER: &str = "# Your code here\n\n";

struct TopicSeed {
    id: &'static str,
    title: &'static str,
    description: &'static str,
}

struct ExerciseSeed {
    id: &'static str,
    title: &'static str,
    difficulty: &'static str,
    description: &'static str,
}

const BASICS: &[TopicSeed] = &[
    TopicSeed {
        id: "variables",
        title: "Variables and Data Types",
        description: "Learn about different data types in Python and how to use variables.",
    },
    TopicSeed {
        id: "control_flow",
        title: "Control Flow",
        description: "Master conditional statements and loops in Python.",
    },
];

const DATA_STRUCTURES: &[TopicSeed] = &[TopicSeed {
    id: "lists",
    title: "Lists and Tuples",
    description: "Explore sequence data types in Python: lists and tuples.",
}];

const VARIABLES: &[ExerciseSeed] = &[
    ExerciseSeed {
        id: "var-assignment",
        title: "Variable Assignment",
        difficulty: "beginner",
        description: "Learn how to assign values to variables in Python.",
    },
    ExerciseSeed {
        id: "data-types",
        title: "Working with Data Types",
        difficulty: "beginner",
        description: "Explore different data types like integers, floats, and strings.",
    },
    ExerciseSeed {
        id: "type-conversion",
        title: "Type Conversion",
        difficulty: "intermediate",
        description: "Convert between different data types in Python.",
    },
];

const LISTS: &[ExerciseSeed] = &[
    ExerciseSeed {
        id: "list-basics",
        title: "List Basics",
        difficulty: "beginner",
        description: "Learn how to create and manipulate lists in Python.",
    },
    ExerciseSeed {
        id: "list-methods",
        title: "List Methods",
        difficulty: "beginner",
        description: "Explore built-in methods for working with lists.",
    },
    ExerciseSeed {
        id: "list-slicing",
        title: "List Slicing",
        difficulty: "intermediate",
        description: "Extract parts of a list using slicing syntax.",
    },
    ExerciseSeed {
        id: "list-comprehension",
        title: "List Comprehension",
        difficulty: "intermediate",
        description: "Create lists using concise list comprehension syntax.",
    },
];

fn topics(seeds: &[TopicSeed]) -> Vec<TopicSummary> {
    seeds
        .iter()
        .map(|seed| TopicSummary {
            id: seed.id.to_string(),
            title: seed.title.to_string(),
            description: Some(seed.description.to_string()),
        })
        .collect()
}

pub(crate) fn chapters() -> Vec<Chapter> {
    vec![
        Chapter {
            id: "basics".to_string(),
            title: "Basics".to_string(),
            description: None,
            topics: topics(BASICS),
        },
        Chapter {
            id: "data_structures".to_string(),
            title: "Data Structures".to_string(),
            description: None,
            topics: topics(DATA_STRUCTURES),
        },
    ]
}

pub(crate) fn chapter(id: &str) -> Option<Chapter> {
    chapters().into_iter().find(|chapter| chapter.id == id)
}

pub(crate) fn topic_exercises(topic_id: &str) -> Vec<Exercise> {
    let seeds = match topic_id {
        "variables" => VARIABLES,
        "lists" => LISTS,
        _ => return Vec::new(),
    };

    let chapter = chapters()
        .into_iter()
        .find(|chapter| chapter.topics.iter().any(|t| t.id == topic_id));
    let topic_title = chapter
        .as_ref()
        .and_then(|chapter| chapter.topics.iter().find(|t| t.id == topic_id))
        .map(|topic| topic.title.clone());

    seeds
        .iter()
        .map(|seed| {
            if seed.id == "list-comprehension" {
                return sample_exercise();
            }
            Exercise {
                id: seed.id.to_string(),
                title: seed.title.to_string(),
                difficulty: Some(seed.difficulty.to_string()),
                description: Some(seed.description.to_string()),
                instructions: Some(seed.description.to_string()),
                starter_code: Some(PLACEHOLDER_STARTER.to_string()),
                topic_id: Some(topic_id.to_string()),
                topic_title: topic_title.clone(),
                chapter_id: chapter.as_ref().map(|c| c.id.clone()),
                chapter_title: chapter.as_ref().map(|c| c.title.clone()),
                ..Exercise::default()
            }
        })
        .collect()
}

/// The fully written-out offline exercise.
pub(crate) fn sample_exercise() -> Exercise {
    Exercise {
        id: "list-comprehension".to_string(),
        title: "List Comprehension".to_string(),
        difficulty: Some("intermediate".to_string()),
        description: Some(
            "List comprehensions provide a concise way to create lists based on existing \
             lists or other iterables."
                .to_string(),
        ),
        instructions: Some(
            "Create a list comprehension that generates a list of squares for numbers from \
             1 to 10."
                .to_string(),
        ),
        starter_code: Some("squares = [x**2 for x in range(1, 11)]".to_string()),
        topic_id: Some("lists".to_string()),
        topic_title: Some("Lists and Tuples".to_string()),
        chapter_id: Some("data_structures".to_string()),
        chapter_title: Some("Data Structures".to_string()),
        ..Exercise::default()
    }
}

/// A bundled exercise by id, or the sample exercise when none matches.
pub(crate) fn exercise(id: &str) -> Exercise {
    ["variables", "lists"]
        .into_iter()
        .flat_map(topic_exercises)
        .find(|exercise| exercise.id == id)
        .unwrap_or_else(sample_exercise)
}
