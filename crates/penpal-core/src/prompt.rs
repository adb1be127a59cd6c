//! Prompt Builder — fixed instruction templates for the model.
//!
//! Request fields are interpolated verbatim: no escaping, truncation, or
//! length checks. Each template spells out the JSON object the model must
//! answer with, and [`crate::interpret`] reads exactly those keys back.

use serde::{Deserialize, Serialize};

use crate::letter::{AdditionalInfoRequest, LetterGenerationRequest, QaTurn};

/// Language the instruction templates are written in.
///
/// Korean is the service's native language; the model usually answers in
/// the language of the prompt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptLanguage {
    #[default]
    Korean,
    English,
}

impl std::str::FromStr for PromptLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "korean" | "ko" => Ok(PromptLanguage::Korean),
            "english" | "en" => Ok(PromptLanguage::English),
            other => Err(format!("unknown prompt language '{other}'")),
        }
    }
}

impl std::fmt::Display for PromptLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromptLanguage::Korean => f.write_str("korean"),
            PromptLanguage::English => f.write_str("english"),
        }
    }
}

// ─────────────────────────────────────────────
// Public builders
// ─────────────────────────────────────────────

/// Ask the model to summarize the writing style shown by `samples`.
///
/// Samples are listed as numbered situations, in the order given.
pub fn build_style_analysis_prompt<S: AsRef<str>>(samples: &[S], lang: PromptLanguage) -> String {
    let situations = samples
        .iter()
        .enumerate()
        .map(|(i, s)| match lang {
            PromptLanguage::Korean => format!("상황 {}: {}", i + 1, s.as_ref()),
            PromptLanguage::English => format!("Situation {}: {}", i + 1, s.as_ref()),
        })
        .collect::<Vec<_>>()
        .join("\n");

    match lang {
        PromptLanguage::Korean => style_prompt_ko(samples.len(), &situations),
        PromptLanguage::English => style_prompt_en(samples.len(), &situations),
    }
}

/// First letter turn: ask one clarifying question, or write the letter.
pub fn build_letter_prompt(request: &LetterGenerationRequest, lang: PromptLanguage) -> String {
    let details = render_letter_details(request, lang);
    match lang {
        PromptLanguage::Korean => letter_prompt_ko(&details),
        PromptLanguage::English => letter_prompt_en(&details),
    }
}

/// Follow-up turn: replay the exchange so far and push toward a final letter.
pub fn build_resume_prompt(request: &AdditionalInfoRequest, lang: PromptLanguage) -> String {
    let mut context = String::new();
    if let Some(ref letter) = request.letter {
        context.push_str(match lang {
            PromptLanguage::Korean => "편지 작성 정보:\n\n",
            PromptLanguage::English => "Letter details:\n\n",
        });
        context.push_str(&render_letter_details(letter, lang));
        context.push_str("\n\n");
    }

    let history = render_history(&request.history, lang);

    let mut latest = String::new();
    if let Some(ref question) = request.question {
        latest.push_str(match lang {
            PromptLanguage::Korean => "가장 최근 질문: ",
            PromptLanguage::English => "Most recent question: ",
        });
        latest.push_str(question);
        latest.push('\n');
    }

    match lang {
        PromptLanguage::Korean => {
            resume_prompt_ko(&context, &history, &latest, &request.new_answer)
        }
        PromptLanguage::English => {
            resume_prompt_en(&context, &history, &latest, &request.new_answer)
        }
    }
}

// ─────────────────────────────────────────────
// Shared fragments
// ─────────────────────────────────────────────

fn render_letter_details(request: &LetterGenerationRequest, lang: PromptLanguage) -> String {
    match lang {
        PromptLanguage::Korean => format!(
            "1. 작성자의 문체 특징: {}\n2. 편지 작성 목적: {}\n3. 편지 수신인과의 관계: {}\n4. 포함할 에피소드 또는 내용: {}",
            request.style_characteristics, request.purpose, request.recipient, request.episode
        ),
        PromptLanguage::English => format!(
            "1. The writer's style characteristics: {}\n2. Purpose of the letter: {}\n3. Relationship with the recipient: {}\n4. Episode or content to include: {}",
            request.style_characteristics, request.purpose, request.recipient, request.episode
        ),
    }
}

fn render_history(history: &[QaTurn], lang: PromptLanguage) -> String {
    if history.is_empty() {
        return match lang {
            PromptLanguage::Korean => "(이전에 오간 질문과 답변이 없습니다)".to_string(),
            PromptLanguage::English => "(no earlier questions and answers)".to_string(),
        };
    }
    history
        .iter()
        .map(|turn| format!("Q: {}\nA: {}", turn.question, turn.answer))
        .collect::<Vec<_>>()
        .join("\n")
}

const LETTER_STRUCTURE_KO: &str = "1. 인사말
2. 도입부 (편지를 쓰게 된 계기나 근황)
3. 본문 (주요 내용과 에피소드 포함)
4. 마무리 (향후 계획이나 바람, 당부 등)
5. 맺음말

편지의 길이는 약 300-500자 정도로 작성해 주세요. 작성자의 문체를 정확히 반영하면서 자연스럽고 진정성 있는 편지를 작성해 주세요.";

const LETTER_STRUCTURE_EN: &str = "1. Greeting
2. Introduction (what prompted the letter, or recent news)
3. Body (the main content, including the episode)
4. Closing (future plans, wishes, or requests)
5. Sign-off

Keep the letter to roughly 300-500 characters. Reflect the writer's style precisely and make the letter natural and sincere.";

// ─────────────────────────────────────────────
// Korean templates
// ─────────────────────────────────────────────

fn style_prompt_ko(count: usize, situations: &str) -> String {
    format!(
        r#"당신은 뛰어난 언어 분석가입니다. 아래 주어진 {count}가지 상황에 대한 텍스트를 분석하여 작성자의 문체적 특징을 추출해주세요. 다음 요소들에 주목해 주십시오:

1. 문장 길이와 구조
2. 어휘 선택 (격식체/비격식체, 현대어/고어 등)
3. 문법적 특징 (능동태/수동태 선호도, 접속사 사용 빈도 등)
4. 수사적 기법 (은유, 직유, 반복 등)
5. 전반적인 어조 (정중함, 친근함, 유머 등)
6. 상황에 따른 문체 변화

각 상황별 텍스트:

{situations}

분석 결과를 바탕으로, 이 작성자의 전반적인 문체를 요약해서 요약문만 다음과 같은 JSON 형식으로 응답해주세요.

{{"style": "여기에 요약된 내용을 작성하세요"}}"#
    )
}

fn letter_prompt_ko(details: &str) -> String {
    format!(
        r#"당신은 사용자의 문체를 완벽히 모방할 수 있는 편지 작성 전문가입니다. 사용자의 문체를 정확히 반영한 편지를 작성하기 위해, 필요한 정보를 수집하고 편지를 생성할 것입니다.

{details}

위 정보를 바탕으로, 편지 작성에 필요한 추가 정보가 있다면 사용자에게 한 가지 질문을 해주세요. 추가 정보가 필요 없다면 바로 편지를 작성해주세요.

만약 질문이 필요하다면, 다음과 같은 JSON 형식으로 응답해주세요:
{{"additional_question": "여기에 질문을 작성하세요"}}

질문이 필요 없다면, 다음과 같은 구조로 편지를 작성해 주세요:

{LETTER_STRUCTURE_KO}

편지를 작성한 경우, 다음과 같은 JSON 형식으로 응답해주세요:
{{"generated_letter": "여기에 생성된 편지 내용을 작성하세요"}}"#
    )
}

fn resume_prompt_ko(context: &str, history: &str, latest: &str, new_answer: &str) -> String {
    format!(
        r#"{context}이전에 다음과 같은 질문과 답변이 오갔습니다:

{history}

{latest}가장 최근 질문에 대한 사용자의 새로운 답변: {new_answer}

이 모든 정보를 바탕으로, 편지를 작성해주세요. 다음과 같은 구조로 편지를 작성해 주세요:

{LETTER_STRUCTURE_KO}

편지를 작성한 후, 다음과 같은 JSON 형식으로 응답해주세요:
{{"generated_letter": "여기에 생성된 편지 내용을 작성하세요"}}

만약 추가 정보가 여전히 부족하다면, 다음과 같은 JSON 형식으로 응답해주세요:
{{"additional_question": "여기에 추가 질문을 작성하세요"}}"#
    )
}

// ─────────────────────────────────────────────
// English templates
// ─────────────────────────────────────────────

fn style_prompt_en(count: usize, situations: &str) -> String {
    format!(
        r#"You are an outstanding language analyst. Analyze the texts below, written in {count} different situations, and extract the author's stylistic characteristics. Pay attention to:

1. Sentence length and structure
2. Word choice (formal/informal register, modern/archaic vocabulary, etc.)
3. Grammatical features (active/passive voice preference, frequency of conjunctions, etc.)
4. Rhetorical devices (metaphor, simile, repetition, etc.)
5. Overall tone (politeness, friendliness, humor, etc.)
6. How the style shifts between situations

Texts by situation:

{situations}

Based on your analysis, summarize the author's overall style and reply with only the summary in the following JSON format.

{{"style": "write the summary here"}}"#
    )
}

fn letter_prompt_en(details: &str) -> String {
    format!(
        r#"You are a letter-writing expert who can perfectly imitate a user's writing style. To write a letter that reflects the user's style precisely, you will gather the information you need and then write the letter.

{details}

Based on the information above, if you need more information to write the letter, ask the user exactly one question. If no more information is needed, write the letter right away.

If a question is needed, reply in the following JSON format:
{{"additional_question": "write the question here"}}

If no question is needed, write the letter with the following structure:

{LETTER_STRUCTURE_EN}

If you wrote the letter, reply in the following JSON format:
{{"generated_letter": "write the letter here"}}"#
    )
}

fn resume_prompt_en(context: &str, history: &str, latest: &str, new_answer: &str) -> String {
    format!(
        r#"{context}The following questions and answers were exchanged earlier:

{history}

{latest}The user's new answer to the most recent question: {new_answer}

Using all of this information, write the letter with the following structure:

{LETTER_STRUCTURE_EN}

After writing the letter, reply in the following JSON format:
{{"generated_letter": "write the letter here"}}

If information is still missing, reply in the following JSON format instead:
{{"additional_question": "write the follow-up question here"}}"#
    )
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpret::{LETTER_KEY, QUESTION_KEY, STYLE_KEY};

    fn sample_letter() -> LetterGenerationRequest {
        LetterGenerationRequest {
            style_characteristics: "짧고 다정한 문장".to_string(),
            purpose: "생일 축하".to_string(),
            recipient: "대학 동기".to_string(),
            episode: "제주도 여행에서 길을 잃었던 일".to_string(),
        }
    }

    // ── style analysis ──

    #[test]
    fn test_style_prompt_embeds_samples_in_order() {
        for lang in [PromptLanguage::Korean, PromptLanguage::English] {
            let prompt = build_style_analysis_prompt(&["a", "b", "c"], lang);
            let a = prompt.find(": a\n").unwrap();
            let b = prompt.find(": b\n").unwrap();
            let c = prompt.find(": c\n").unwrap();
            assert!(a < b && b < c, "samples out of order for {lang}");
            assert!(prompt.contains(STYLE_KEY));
        }
    }

    #[test]
    fn test_style_prompt_numbering_and_count() {
        let prompt =
            build_style_analysis_prompt(&["first", "second", "third"], PromptLanguage::Korean);
        assert!(prompt.contains("3가지 상황"));
        assert!(prompt.contains("상황 1: first"));
        assert!(prompt.contains("상황 2: second"));
        assert!(prompt.contains("상황 3: third"));
    }

    #[test]
    fn test_style_prompt_single_sample() {
        let prompt = build_style_analysis_prompt(&["just one"], PromptLanguage::English);
        assert!(prompt.contains("written in 1 different situations"));
        assert!(prompt.contains("Situation 1: just one"));
        assert!(!prompt.contains("Situation 2"));
    }

    #[test]
    fn test_style_prompt_verbatim_user_text() {
        let tricky = r#"He said "{hi}" \n and left"#;
        let prompt = build_style_analysis_prompt(&[tricky], PromptLanguage::English);
        assert!(prompt.contains(tricky));
    }

    #[test]
    fn test_style_prompt_rubric() {
        let prompt = build_style_analysis_prompt(&["x"], PromptLanguage::English);
        for item in [
            "Sentence length and structure",
            "Word choice",
            "Grammatical features",
            "Rhetorical devices",
            "Overall tone",
            "shifts between situations",
        ] {
            assert!(prompt.contains(item), "missing rubric item: {item}");
        }
    }

    // ── letter ──

    #[test]
    fn test_letter_prompt_contains_all_fields() {
        let req = sample_letter();
        let prompt = build_letter_prompt(&req, PromptLanguage::Korean);
        assert!(prompt.contains("1. 작성자의 문체 특징: 짧고 다정한 문장"));
        assert!(prompt.contains("2. 편지 작성 목적: 생일 축하"));
        assert!(prompt.contains("3. 편지 수신인과의 관계: 대학 동기"));
        assert!(prompt.contains("4. 포함할 에피소드 또는 내용: 제주도 여행에서 길을 잃었던 일"));
        assert!(prompt.contains(QUESTION_KEY));
        assert!(prompt.contains(LETTER_KEY));
        assert!(prompt.contains("300-500"));
    }

    #[test]
    fn test_letter_prompt_json_examples_are_valid_json() {
        let prompt = build_letter_prompt(&sample_letter(), PromptLanguage::English);
        let examples: Vec<&str> = prompt.lines().filter(|l| l.starts_with('{')).collect();
        assert_eq!(examples.len(), 2);
        for line in examples {
            let value: serde_json::Value = serde_json::from_str(line).unwrap();
            assert!(value.is_object());
        }
    }

    #[test]
    fn test_letter_prompt_five_part_structure() {
        let prompt = build_letter_prompt(&sample_letter(), PromptLanguage::English);
        for part in ["1. Greeting", "2. Introduction", "3. Body", "4. Closing", "5. Sign-off"] {
            assert!(prompt.contains(part), "missing part: {part}");
        }
    }

    // ── resume ──

    #[test]
    fn test_resume_prompt_empty_history() {
        let req = AdditionalInfoRequest {
            history: vec![],
            question: None,
            new_answer: "작년 여름".to_string(),
            temperature: 0.7,
            letter: None,
        };
        let prompt = build_resume_prompt(&req, PromptLanguage::Korean);
        assert!(prompt.contains("이전에 오간 질문과 답변이 없습니다"));
        assert!(prompt.contains("새로운 답변: 작년 여름"));
        assert!(!prompt.contains("편지 작성 정보"));
    }

    #[test]
    fn test_resume_prompt_history_in_order() {
        let req = AdditionalInfoRequest::answering("Which gift?", "A scarf").with_history(vec![
            QaTurn::new("When did you meet?", "2015"),
            QaTurn::new("Where?", "Seoul"),
        ]);
        let prompt = build_resume_prompt(&req, PromptLanguage::English);
        let first = prompt.find("Q: When did you meet?\nA: 2015").unwrap();
        let second = prompt.find("Q: Where?\nA: Seoul").unwrap();
        let latest = prompt.find("Most recent question: Which gift?").unwrap();
        let answer = prompt.find("most recent question: A scarf").unwrap();
        assert!(first < second && second < latest && latest < answer);
    }

    #[test]
    fn test_resume_prompt_long_history() {
        let history: Vec<QaTurn> = (0..50)
            .map(|i| QaTurn::new(format!("q{i}"), format!("a{i}")))
            .collect();
        let req = AdditionalInfoRequest::answering("last", "answer").with_history(history);
        let prompt = build_resume_prompt(&req, PromptLanguage::Korean);
        assert!(prompt.contains("Q: q0\nA: a0"));
        assert!(prompt.contains("Q: q49\nA: a49"));
    }

    #[test]
    fn test_resume_prompt_includes_letter_context() {
        let req = AdditionalInfoRequest::answering("q", "a").with_letter(sample_letter());
        let prompt = build_resume_prompt(&req, PromptLanguage::Korean);
        assert!(prompt.starts_with("편지 작성 정보:"));
        assert!(prompt.contains("짧고 다정한 문장"));
        assert!(prompt.contains(LETTER_KEY));
        assert!(prompt.contains(QUESTION_KEY));
    }

    // ── language ──

    #[test]
    fn test_language_from_str() {
        assert_eq!("ko".parse::<PromptLanguage>().unwrap(), PromptLanguage::Korean);
        assert_eq!("English".parse::<PromptLanguage>().unwrap(), PromptLanguage::English);
        assert!("klingon".parse::<PromptLanguage>().is_err());
    }

    #[test]
    fn test_language_serde() {
        let lang: PromptLanguage = serde_json::from_str("\"english\"").unwrap();
        assert_eq!(lang, PromptLanguage::English);
        assert_eq!(serde_json::to_string(&PromptLanguage::Korean).unwrap(), "\"korean\"");
    }
}
