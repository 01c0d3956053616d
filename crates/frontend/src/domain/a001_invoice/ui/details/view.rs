use super::view_model::{parse_number, InvoiceDetailsViewModel};
use crate::shared::icons::icon;
use chrono::NaiveDate;
use contracts::domain::a001_invoice::aggregate::{Invoice, InvoiceStatus};
use contracts::shared::grid::ValueFormatter;
use leptos::prelude::*;
use thaw::*;

fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Message under an input, if the field has one.
#[component]
fn FieldError(vm: InvoiceDetailsViewModel, #[prop(into)] field: String) -> impl IntoView {
    move || {
        vm.field_error(&field)
            .map(|message| view! { <div class="field-error">{message}</div> })
    }
}

#[component]
pub fn InvoiceDetails(
    id: Option<String>,
    on_saved: Callback<Invoice>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let vm = InvoiceDetailsViewModel::new();
    vm.load_if_needed(id);

    let lines = move || {
        vm.form.with(|f| {
            f.line_items
                .iter()
                .cloned()
                .enumerate()
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="details-container invoice-details">
            {move || vm.error.get().map(|e| view! { <div class="error">{e}</div> })}

            <Show when=move || vm.loading.get()>
                <Spinner />
            </Show>

            <div class="details-form">
                <div class="form-row">
                    <div class="form-group">
                        <label for="customer_name">"Покупатель"</label>
                        <input
                            type="text"
                            id="customer_name"
                            class:input--invalid=move || vm.field_error("customer_name").is_some()
                            prop:value=move || vm.form.with(|f| f.customer_name.clone())
                            on:input=move |ev| vm.form.update(|f| f.customer_name = event_target_value(&ev))
                            placeholder="Наименование покупателя"
                        />
                        <FieldError vm=vm field="customer_name" />
                    </div>

                    <div class="form-group">
                        <label for="customer_email">"Email"</label>
                        <input
                            type="email"
                            id="customer_email"
                            prop:value=move || vm.form.with(|f| f.customer_email.clone().unwrap_or_default())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                vm.form.update(|f| {
                                    f.customer_email = if value.is_empty() { None } else { Some(value) };
                                });
                            }
                            placeholder="необязательно"
                        />
                        <FieldError vm=vm field="customer_email" />
                    </div>
                </div>

                <div class="form-row">
                    <div class="form-group">
                        <label for="issue_date">"Дата выставления"</label>
                        <input
                            type="date"
                            id="issue_date"
                            prop:value=move || vm.form.with(|f| f.issue_date.format("%Y-%m-%d").to_string())
                            on:change=move |ev| {
                                if let Some(date) = parse_date(&event_target_value(&ev)) {
                                    vm.form.update(|f| f.issue_date = date);
                                }
                            }
                        />
                        <FieldError vm=vm field="issue_date" />
                    </div>

                    <div class="form-group">
                        <label for="due_date">"Срок оплаты"</label>
                        <input
                            type="date"
                            id="due_date"
                            prop:value=move || vm.form.with(|f| f.due_date.format("%Y-%m-%d").to_string())
                            on:change=move |ev| {
                                if let Some(date) = parse_date(&event_target_value(&ev)) {
                                    vm.form.update(|f| f.due_date = date);
                                }
                            }
                        />
                        <FieldError vm=vm field="due_date" />
                    </div>

                    <div class="form-group">
                        <label for="status">"Статус"</label>
                        <select
                            id="status"
                            prop:value=move || vm.form.with(|f| f.status.as_str().to_string())
                            on:change=move |ev| {
                                if let Some(status) = InvoiceStatus::parse(&event_target_value(&ev)) {
                                    vm.form.update(|f| f.status = status);
                                }
                            }
                        >
                            {InvoiceStatus::all()
                                .into_iter()
                                .map(|s| view! { <option value=s.as_str()>{s.display_name()}</option> })
                                .collect_view()}
                        </select>
                    </div>

                    <div class="form-group">
                        <label for="currency">"Валюта"</label>
                        <input
                            type="text"
                            id="currency"
                            maxlength="3"
                            prop:value=move || vm.form.with(|f| f.currency.clone())
                            on:input=move |ev| vm.form.update(|f| f.currency = event_target_value(&ev))
                        />
                        <FieldError vm=vm field="currency" />
                    </div>
                </div>

                <div class="form-group">
                    <label>"Строки счёта"</label>
                    <table class="line-items">
                        <thead>
                            <tr>
                                <th>"Описание"</th>
                                <th>"Кол-во"</th>
                                <th>"Цена"</th>
                                <th>"Сумма"</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>
                            {move || {
                                lines()
                                    .into_iter()
                                    .map(|(index, line)| {
                                        let line_total = ValueFormatter::Money
                                            .format(&serde_json::json!(line.line_total()));
                                        view! {
                                            <tr>
                                                <td>
                                                    <input
                                                        type="text"
                                                        prop:value=line.description.clone()
                                                        on:change=move |ev| {
                                                            let value = event_target_value(&ev);
                                                            vm.update_line(index, |l| l.description = value);
                                                        }
                                                    />
                                                    <FieldError vm=vm field=format!("line_items[{}].description", index) />
                                                </td>
                                                <td>
                                                    <input
                                                        type="text"
                                                        inputmode="decimal"
                                                        prop:value=line.quantity.to_string()
                                                        on:change=move |ev| {
                                                            let value = parse_number(&event_target_value(&ev));
                                                            vm.update_line(index, |l| l.quantity = value);
                                                        }
                                                    />
                                                    <FieldError vm=vm field=format!("line_items[{}].quantity", index) />
                                                </td>
                                                <td>
                                                    <input
                                                        type="text"
                                                        inputmode="decimal"
                                                        prop:value=line.unit_price.to_string()
                                                        on:change=move |ev| {
                                                            let value = parse_number(&event_target_value(&ev));
                                                            vm.update_line(index, |l| l.unit_price = value);
                                                        }
                                                    />
                                                    <FieldError vm=vm field=format!("line_items[{}].unit_price", index) />
                                                </td>
                                                <td class="line-items__total">{line_total}</td>
                                                <td>
                                                    <button
                                                        class="button button--icon"
                                                        title="Удалить строку"
                                                        on:click=move |_| vm.remove_line(index)
                                                    >
                                                        {icon("delete")}
                                                    </button>
                                                </td>
                                            </tr>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </tbody>
                    </table>
                    <FieldError vm=vm field="line_items" />
                    <Button appearance=ButtonAppearance::Subtle on_click=move |_| vm.add_line()>
                        {icon("plus")}
                        "Добавить строку"
                    </Button>
                    <div class="line-items__grand-total">
                        {move || {
                            let currency = vm.form.with(|f| f.currency.clone());
                            format!(
                                "Итого: {} {}",
                                ValueFormatter::Money.format(&serde_json::json!(vm.total())),
                                currency
                            )
                        }}
                    </div>
                </div>

                <div class="form-group">
                    <label for="notes">"Комментарий"</label>
                    <textarea
                        id="notes"
                        rows="3"
                        prop:value=move || vm.form.with(|f| f.notes.clone().unwrap_or_default())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            vm.form.update(|f| f.notes = if value.is_empty() { None } else { Some(value) });
                        }
                        placeholder="необязательно"
                    />
                </div>
            </div>

            <div class="details-actions">
                <Button
                    appearance=ButtonAppearance::Primary
                    on_click=move |_| vm.save_command(on_saved)
                    disabled=Signal::derive(move || vm.saving.get() || vm.loading.get())
                >
                    {icon("save")}
                    {move || if vm.is_edit_mode() { "Сохранить" } else { "Создать" }}
                </Button>
                <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_cancel.run(())>
                    "Отмена"
                </Button>
            </div>
        </div>
    }
}
