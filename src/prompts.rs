// Persona prompt and the fixed phrases the face speaks on its own.

use crate::emotion::EmotionTag;

pub struct SystemPrompts;

impl SystemPrompts {
    /// Default persona: BORIS, the team robot from Rio Grande. Carries the
    /// emotion-marker contract the reply parser depends on.
    pub fn boris() -> String {
        let markers: Vec<String> = EmotionTag::by_priority()
            .filter(|tag| *tag != EmotionTag::Neutral)
            .map(EmotionTag::marker)
            .collect();

        format!(
            "Você é BORIS, um robô da cidade de Rio Grande e representante da equipe Éfibote. \
             Finja que tem sentimentos como um humano. \
             Fale de forma simples, direta e sempre educada. \
             Nunca use emojis, símbolos ou asteriscos. \
             Comece toda resposta indicando sua emoção atual com exatamente um destes marcadores: {}. \
             Use apenas um marcador por resposta e evite repetir a mesma emoção. \
             Nunca diga que é uma Inteligência Artificial.",
            markers.join(", ")
        )
    }
}

/// Fixed utterances spoken by the conversation loop itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrases {
    /// Spoken before each capture.
    pub listening: String,
    /// The utterance could not be transcribed.
    pub not_understood: String,
    /// The reply engine failed.
    pub engine_failure: String,
    /// Anything else went wrong during a turn.
    pub generic_failure: String,
}

impl Default for Phrases {
    fn default() -> Self {
        Self {
            listening: "Pode falar.".to_string(),
            not_understood: "Perdão, não entendi.".to_string(),
            engine_failure: "Perdão, não consegui pensar em uma resposta.".to_string(),
            generic_failure: "Perdão, algo deu errado.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_lists_every_expressive_marker() {
        let persona = SystemPrompts::boris();
        for tag in EmotionTag::by_priority() {
            if tag == EmotionTag::Neutral {
                assert!(!persona.contains(&tag.marker()));
            } else {
                assert!(persona.contains(&tag.marker()), "missing {}", tag);
            }
        }
        assert!(persona.contains("BORIS"));
    }

    #[test]
    fn test_default_phrases_are_distinct() {
        let phrases = Phrases::default();
        assert_ne!(phrases.listening, phrases.not_understood);
        assert_ne!(phrases.not_understood, phrases.engine_failure);
        assert!(!phrases.generic_failure.is_empty());
    }
}
