//! Prompt texts for every scoring protocol.
//!
//! Placeholders: `{source_lang}`, `{target_lang}`, `{source_seg}`,
//! `{target_seg}`, `{reference_seg}`, `{error_spans}`.

use gemba_core::{ChatMessage, PromptTemplate};

pub const CLASS_LABELS: [&str; 5] = [
    "No meaning preserved",
    "Some meaning preserved, but not understandable",
    "Some meaning preserved and understandable",
    "Most meaning preserved, minor issues",
    "Perfect translation",
];

pub const DA: &str = concat!(
    "Score the following translation from {source_lang} to {target_lang} on a continuous scale from 0 to 100, ",
    "where a score of zero means \"no meaning preserved\" and score of one hundred means \"perfect meaning and grammar\".\n\n",
    "{source_lang} source: \"{source_seg}\"\n",
    "{target_lang} translation: \"{target_seg}\"\n",
    "Score: ",
);

pub const DA_REF: &str = concat!(
    "Score the following translation from {source_lang} to {target_lang} with respect to human reference on a continuous scale 0 to 100 ",
    "where score of zero means \"no meaning preserved\" and score of one hundred means \"perfect meaning and grammar\".\n\n",
    "{source_lang} source: \"{source_seg}\"\n",
    "{target_lang} human reference: {reference_seg}\n",
    "{target_lang} machine translation: \"{target_seg}\"\n",
    "Score: ",
);

pub const SQM: &str = concat!(
    "Score the following translation from {source_lang} to {target_lang} on a continuous scale from 0 to 100 ",
    "that starts on \"No meaning preserved\", goes through \"Some meaning preserved\", ",
    "then \"Most meaning preserved and few grammar mistakes\", up to \"Perfect meaning and grammar\".\n\n",
    "{source_lang} source: \"{source_seg}\"\n",
    "{target_lang} translation: \"{target_seg}\"\n",
    "Score (0-100): ",
);

pub const SQM_REF: &str = concat!(
    "Score the following machine translation from {source_lang} to {target_lang} with respect to the human reference ",
    "on a continuous scale from 0 to 100 that starts with \"No meaning preserved\", goes through \"Some meaning preserved\", ",
    "then \"Most meaning preserved and few grammar mistakes\", up to \"Perfect meaning and grammar\".\n\n",
    "{source_lang} source: \"{source_seg}\"\n",
    "{target_lang} human reference: \"{reference_seg}\"\n",
    "{target_lang} machine translation: \"{target_seg}\"\n",
    "Score (0-100): ",
);

pub const STARS: &str = concat!(
    "Score the following translation from {source_lang} to {target_lang} with one to five stars. ",
    "Where one star means \"Nonsense/No meaning preserved\", two stars mean \"Some meaning preserved, but not understandable\", ",
    "three stars mean \"Some meaning preserved and understandable\", four stars mean \"Most meaning preserved with possibly few grammar mistakes\", ",
    "and five stars mean \"Perfect meaning and grammar\".\n\n",
    "{source_lang} source: \"{source_seg}\"\n",
    "{target_lang} translation: \"{target_seg}\"\n",
    "Stars: ",
);

pub const STARS_REF: &str = concat!(
    "Score the following translation from {source_lang} to {target_lang} with respect to the human reference with one to five stars. ",
    "Where one star means \"Nonsense/No meaning preserved\", two stars mean \"Some meaning preserved, but not understandable\", ",
    "three stars mean \"Some meaning preserved and understandable\", four stars mean \"Most meaning preserved with possibly few grammar mistakes\", ",
    "and five stars mean \"Perfect meaning and grammar\".\n\n",
    "{source_lang} source: \"{source_seg}\"\n",
    "{target_lang} human reference: \"{reference_seg}\"\n",
    "{target_lang} translation: \"{target_seg}\"\n",
    "Stars: ",
);

pub const CLASSES: &str = concat!(
    "Classify the quality of machine translation from {source_lang} to {target_lang} into one of following classes: ",
    "\"No meaning preserved\", \"Some meaning preserved, but not understandable\", \"Some meaning preserved and understandable\", ",
    "\"Most meaning preserved, minor issues\", \"Perfect translation\".\n\n",
    "{source_lang} source: \"{source_seg}\"\n",
    "{target_lang} machine translation: \"{target_seg}\"\n",
    "Class: ",
);

pub const CLASSES_REF: &str = concat!(
    "Classify the quality of machine translation from {source_lang} to {target_lang} with respect to the human reference into one of following classes: ",
    "\"No meaning preserved\", \"Some meaning preserved, but not understandable\", \"Some meaning preserved and understandable\", ",
    "\"Most meaning preserved, minor issues\", \"Perfect translation\".\n\n",
    "{source_lang} source: \"{source_seg}\"\n",
    "{target_lang} human reference: \"{reference_seg}\"\n",
    "{target_lang} machine translation: \"{target_seg}\"\n",
    "Class: ",
);

const MQM_SYSTEM: &str = "You are an annotator for the quality of machine translation. Your task is to identify errors and assess the quality of the translation.";

const MQM_INSTRUCTION: &str = concat!(
    "{source_lang} source:\n",
    "```{source_seg}```\n",
    "{target_lang} translation:\n",
    "```{target_seg}```\n\n",
    "Based on the source segment and machine translation surrounded with triple backticks, identify error types in the translation and classify them. ",
    "The categories of errors are: accuracy (addition, mistranslation, omission, untranslated text), ",
    "fluency (character encoding, grammar, inconsistency, punctuation, register, spelling), style (awkward), ",
    "terminology (inappropriate for context, inconsistent use), non-translation, other, or no-error.\n",
    "Each error is classified as one of three categories: critical, major, and minor. ",
    "Critical errors inhibit comprehension of the text. Major errors disrupt the flow, but what the text is trying to say is still understandable. ",
    "Minor errors are technically errors, but do not disrupt the flow or hinder comprehension.",
);

/// One worked example shown to the model before the real segment.
struct FewShot {
    source_lang: &'static str,
    target_lang: &'static str,
    source_seg: &'static str,
    target_seg: &'static str,
    answer: &'static str,
}

const MQM_FEW_SHOTS: [FewShot; 3] = [
    FewShot {
        source_lang: "English",
        target_lang: "German",
        source_seg: "I do apologise about this, we must gain permission from the account holder to discuss an order with another person, I apologise if this was done previously, however, I would not be able to discuss this with yourself without the account holders permission.",
        target_seg: "Ich entschuldige mich dafür, wir müssen die Erlaubnis einholen, um eine Bestellung mit einer anderen Person zu besprechen. Ich entschuldige mich, falls dies zuvor geschehen wäre, aber ohne die Erlaubnis des Kontoinhabers wäre ich nicht in der Lage, dies mit dir involvement.",
        answer: "Critical:\nno-error\nMajor:\naccuracy/mistranslation - \"involvement\"\naccuracy/omission - \"the account holder\"\nMinor:\nfluency/grammar - \"wäre\"\nfluency/register - \"dir\"\n",
    },
    FewShot {
        source_lang: "English",
        target_lang: "Czech",
        source_seg: "Talks have resumed in Vienna to try to revive the nuclear pact, with both sides trying to gauge the prospects of success after the latest exchanges in the stop-start negotiations.",
        target_seg: "Rozhovory se obnovily ve Vídni, aby se pokusily oživit jadernou dohodu, přičemž obě partaje se snaží posoudit vyhlídky na úspěch po posledních výměnách v jednáních.",
        answer: "Critical:\nno-error\nMajor:\naccuracy/omission - \"the stop-start\"\nMinor:\nterminology/inappropriate for context - \"partaje\"\n",
    },
    FewShot {
        source_lang: "Chinese",
        target_lang: "English",
        source_seg: "大众点评乌鲁木齐家居卖场频道为您提供高铁居然之家地址，电话，营业时间等最新商户信息，找装修公司，就上大众点评",
        target_seg: "Urumqi Home Furnishing Store Channel provides you with the latest business information such as the address, telephone number, business hours, etc., of high-speed rail, and find a decoration company, and go to the reviews.",
        answer: "Critical:\naccuracy/addition - \"of high-speed rail\"\nMajor:\naccuracy/mistranslation - \"go to the reviews\"\nMinor:\nstyle/awkward - \"etc.,\"\n",
    },
];

fn mqm_instruction_for(shot: &FewShot) -> String {
    MQM_INSTRUCTION
        .replace("{source_lang}", shot.source_lang)
        .replace("{target_lang}", shot.target_lang)
        .replace("{source_seg}", shot.source_seg)
        .replace("{target_seg}", shot.target_seg)
}

/// Few-shot MQM conversation ending with the segment to annotate.
pub fn mqm_template() -> PromptTemplate {
    let mut messages = vec![ChatMessage::system(MQM_SYSTEM)];
    for shot in &MQM_FEW_SHOTS {
        messages.push(ChatMessage::user(mqm_instruction_for(shot)));
        messages.push(ChatMessage::assistant(shot.answer));
    }
    messages.push(ChatMessage::user(MQM_INSTRUCTION));
    PromptTemplate::chat(messages)
}

pub const ESA_ERROR_SPANS: &str = concat!(
    "{source_lang} source:\n",
    "```{source_seg}```\n",
    "{target_lang} translation:\n",
    "```{target_seg}```\n\n",
    "Based on the source segment and machine translation surrounded with triple backticks, identify error types in the translation and classify them. ",
    "The categories of errors are: accuracy (addition, mistranslation, omission, untranslated text), ",
    "fluency (character encoding, grammar, inconsistency, punctuation, register, spelling), style (awkward), ",
    "terminology (inappropriate for context, inconsistent use), non-translation, other, or no-error.\n",
    "Each error is classified as one of two categories: major or minor. ",
    "Major errors disrupt the flow and make the understandability of text difficult or impossible. ",
    "Minor errors are errors that do not disrupt the flow significantly and what the text is trying to say is still understandable.",
);

pub const ESA_RANKING: &str = concat!(
    "Given the translation from {source_lang} to {target_lang} and the annotated error spans, assign a score on a continuous scale from 0 to 100. ",
    "The scale has following reference points: 0=\"No meaning preserved\", 33=\"Some meaning preserved\", ",
    "66=\"Most meaning preserved and few grammar mistakes\", up to 100=\"Perfect meaning and grammar\".\n\n",
    "Score the following translation from {source_lang} source:\n",
    "```{source_seg}```\n",
    "{target_lang} translation:\n",
    "```{target_seg}```\n",
    "Annotated error spans:\n",
    "```{error_spans}```\n",
    "Score (0-100): ",
);
