use web_sys::HtmlInputElement;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct InputProps {
    pub label: AttrValue,
    #[prop_or(AttrValue::Static("text"))]
    pub input_type: AttrValue,
    #[prop_or_default]
    pub value: AttrValue,
    #[prop_or_default]
    pub placeholder: AttrValue,
    #[prop_or_default]
    pub required: bool,
    #[prop_or_default]
    pub min_length: Option<u32>,
    #[prop_or_default]
    pub disabled: bool,
    #[prop_or_default]
    pub oninput: Callback<String>,
}

/// Labelled text input that reports its whole value on every keystroke.
#[function_component(Input)]
pub fn input(props: &InputProps) -> Html {
    let oninput = {
        let on_value = props.oninput.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            on_value.emit(input.value());
        })
    };

    html! {
        <label class="field">
            <span class="field-label">{ props.label.clone() }</span>
            <input
                class="field-input"
                type={props.input_type.clone()}
                value={props.value.clone()}
                placeholder={props.placeholder.clone()}
                required={props.required}
                minlength={props.min_length.map(|n| n.to_string())}
                disabled={props.disabled}
                {oninput}
            />
        </label>
    }
}
