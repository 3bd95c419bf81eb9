//! Colour tokens for the wallet modal and the connect button.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThemeVariant {
    Dark,
    Light,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModalTheme {
    pub bg_color: String,
    pub text_color: String,
    pub solid_text_color: String,
    pub header_button_color: String,
    pub divider_color: String,
    pub help_bg_color: String,
    pub not_available_text_color: String,
    pub not_available_bg_color: String,
    pub not_available_border_color: String,
}

impl ModalTheme {
    pub fn preset(variant: ThemeVariant) -> Self {
        match variant {
            ThemeVariant::Dark => Self {
                bg_color: "#161616".to_owned(),
                text_color: "#a0a0a0".to_owned(),
                solid_text_color: "#ededed".to_owned(),
                header_button_color: "#707070".to_owned(),
                divider_color: "rgba(255, 255, 255, 0.15)".to_owned(),
                help_bg_color: "#1c1c1c".to_owned(),
                not_available_text_color: "#a0a0a0".to_owned(),
                not_available_bg_color: "#232323".to_owned(),
                not_available_border_color: "#343434".to_owned(),
            },
            ThemeVariant::Light => Self {
                bg_color: "#fcfcfc".to_owned(),
                text_color: "#181818".to_owned(),
                solid_text_color: "#000000".to_owned(),
                header_button_color: "#8f8f8f".to_owned(),
                divider_color: "rgba(0, 0, 0, 0.15)".to_owned(),
                help_bg_color: "#f8f8f8".to_owned(),
                not_available_text_color: "#6f6f6f".to_owned(),
                not_available_bg_color: "#f3f3f3".to_owned(),
                not_available_border_color: "#e2e2e2".to_owned(),
            },
        }
    }

    /// CSS custom properties applied to the modal root.
    pub fn css_vars(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("--modal-bg-color", self.bg_color.as_str()),
            ("--modal-text-color", self.text_color.as_str()),
            ("--modal-solid-text-color", self.solid_text_color.as_str()),
            ("--modal-header-button-color", self.header_button_color.as_str()),
            ("--modal-divider-color", self.divider_color.as_str()),
            ("--modal-help-bg-color", self.help_bg_color.as_str()),
            ("--modal-not-available-text-color", self.not_available_text_color.as_str()),
            ("--modal-not-available-bg-color", self.not_available_bg_color.as_str()),
            ("--modal-not-available-border-color", self.not_available_border_color.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ButtonTheme {
    pub bg_color: String,
    pub text_color: String,
    pub solid_text_color: String,
    pub divider_color: String,
    pub button_padding: String,
    pub button_border_radius: String,
}

impl ButtonTheme {
    pub fn preset(variant: ThemeVariant) -> Self {
        let (bg_color, text_color, solid_text_color, divider_color) = match variant {
            ThemeVariant::Dark => ("#161616", "#a0a0a0", "#ededed", "rgba(255, 255, 255, 0.15)"),
            ThemeVariant::Light => ("#fcfcfc", "#181818", "#000000", "rgba(0, 0, 0, 0.15)"),
        };
        Self {
            bg_color: bg_color.to_owned(),
            text_color: text_color.to_owned(),
            solid_text_color: solid_text_color.to_owned(),
            divider_color: divider_color.to_owned(),
            button_padding: "0.5rem 1.25rem".to_owned(),
            button_border_radius: "0.5rem".to_owned(),
        }
    }

    pub fn css_vars(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("--button-bg-color", self.bg_color.as_str()),
            ("--button-text-color", self.text_color.as_str()),
            ("--button-solid-text-color", self.solid_text_color.as_str()),
            ("--button-divider-color", self.divider_color.as_str()),
            ("--button-padding", self.button_padding.as_str()),
            ("--button-border-radius", self.button_border_radius.as_str()),
        ]
    }
}
