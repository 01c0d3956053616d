//! DataGrid: обёртка над встроенной таблицей.
//!
//! [`GridHandle`] держит `GridController` (пагинация, debounce поиска,
//! сохранение колонок в localStorage) и реактивный снимок для рендера.
//! Поиск и пагинация рендерятся отдельными компонентами
//! (`SearchInput`, `PaginationControls`) поверх того же handle.
//!
//! ```rust,ignore
//! let grid = GridHandle::new(GridOptions::new("a001_invoice"), columns(), GridCallbacks::default());
//! grid.set_rows(rows);
//! view! {
//!     <SearchInput grid=grid />
//!     <DataGrid grid=grid on_row_click=Callback::new(open) />
//!     <PaginationControls grid=grid />
//! }
//! ```

pub mod debounce;
pub mod model;
pub mod widget;

use self::debounce::PendingTimer;
use self::model::{next_sort_model, GridModel};
use self::widget::SignalGridWidget;
use crate::shared::icons::icon;
use crate::shared::storage::BrowserStorage;
use crate::shared::theme::use_theme;
use contracts::shared::grid::{
    CellRenderer, ColumnDef, FilterModel, GridCallbacks, GridController, GridEvent,
    GridFeatures, GridOptions, GridRow, PageRequest, PaginationState, SearchInputOutcome,
    SortDirection,
};
use gloo_timers::callback::Timeout;
use gloo_timers::future::TimeoutFuture;
use leptos::ev;
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;
use wasm_bindgen::JsCast;

type Controller = GridController<SignalGridWidget, BrowserStorage>;

fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

/// Snapshot of controller state the components render from.
#[derive(Debug, Clone, PartialEq)]
pub struct GridView {
    /// `None` only if the options were invalid
    pub pagination: Option<PaginationState>,
    /// All columns in display order with visibility
    pub columns: Vec<(ColumnDef, bool)>,
    pub selection: Vec<String>,
    pub filter_model: FilterModel,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub features: GridFeatures,
    pub search_text: String,
}

impl GridView {
    fn capture(controller: &Controller) -> Self {
        Self {
            pagination: controller.pagination().ok(),
            columns: controller.ordered_columns(),
            selection: controller.selection().to_vec(),
            filter_model: controller.snapshot().filter_model.clone(),
            page_size: controller.page_size(),
            page_size_options: controller.options().page_size_options.clone(),
            features: controller.options().features,
            search_text: controller.search_text().to_string(),
        }
    }
}

#[derive(Clone, Copy)]
pub struct GridHandle {
    controller: StoredValue<Controller, LocalStorage>,
    search_timer: StoredValue<PendingTimer<Timeout>, LocalStorage>,
    model: RwSignal<GridModel>,
    view: RwSignal<GridView>,
}

impl GridHandle {
    pub fn new(options: GridOptions, columns: Vec<ColumnDef>, callbacks: GridCallbacks) -> Self {
        let model = RwSignal::new(GridModel::new());
        let controller = GridController::new(
            options,
            columns,
            SignalGridWidget::new(model),
            BrowserStorage,
            callbacks,
        );
        let view = RwSignal::new(GridView::capture(&controller));
        Self {
            controller: StoredValue::new_local(controller),
            search_timer: StoredValue::new_local(PendingTimer::new()),
            model,
            view,
        }
    }

    /// Runs `f` on the controller and republishes the view.
    ///
    /// Callbacks fire inside `f`; they must not call back into the handle.
    fn act<U>(&self, f: impl FnOnce(&mut Controller) -> U) -> Option<U> {
        let result = self.controller.try_update_value(f);
        if let Some(view) = self.controller.try_with_value(GridView::capture) {
            self.view.set(view);
        }
        result
    }

    pub fn view(&self) -> ReadSignal<GridView> {
        self.view.read_only()
    }

    pub fn model(&self) -> ReadSignal<GridModel> {
        self.model.read_only()
    }

    pub fn set_rows(&self, rows: Vec<GridRow>) {
        self.act(|c| c.set_rows(rows));
    }

    pub fn go_to(&self, request: PageRequest) {
        self.act(|c| c.go_to(request));
    }

    pub fn set_page_size(&self, page_size: usize) {
        self.act(|c| c.set_page_size(page_size));
    }

    pub fn toggle_sort(&self, col_id: &str, additive: bool) {
        let current = self.model.with_untracked(|m| m.sort_model().to_vec());
        let next = next_sort_model(&current, col_id, additive);
        self.act(|c| c.on_event(GridEvent::SortChanged(next)));
    }

    pub fn set_column_filter(&self, col_id: &str, text: String) {
        let mut filters = self.view.with_untracked(|v| v.filter_model.clone());
        if text.trim().is_empty() {
            filters.remove(col_id);
        } else {
            filters.insert(col_id.to_string(), text);
        }
        self.act(|c| c.on_event(GridEvent::FilterChanged(filters)));
    }

    pub fn selection(&self) -> Vec<String> {
        self.view.with_untracked(|v| v.selection.clone())
    }

    pub fn toggle_row(&self, row_id: &str, checked: bool) {
        let mut ids = self.selection();
        ids.retain(|id| id != row_id);
        if checked {
            ids.push(row_id.to_string());
        }
        self.act(|c| c.on_event(GridEvent::SelectionChanged(ids)));
    }

    /// Selects or deselects every row of the current page.
    pub fn toggle_page(&self, checked: bool) {
        let page_ids: Vec<String> = self
            .model
            .with_untracked(|m| m.page_rows().into_iter().map(|r| r.id).collect());
        let mut ids = self.selection();
        ids.retain(|id| !page_ids.contains(id));
        if checked {
            ids.extend(page_ids);
        }
        self.act(|c| c.on_event(GridEvent::SelectionChanged(ids)));
    }

    pub fn clear_selection(&self) {
        self.act(|c| c.on_event(GridEvent::SelectionChanged(Vec::new())));
    }

    pub fn set_column_visible(&self, col_id: &str, visible: bool) {
        self.act(|c| c.set_column_visible(col_id, visible));
    }

    pub fn resize_column(&self, col_id: &str, width: u32) {
        self.act(|c| c.resize_column(col_id, width));
    }

    pub fn move_column(&self, col_id: &str, to_index: usize) {
        self.act(|c| c.move_column(col_id, to_index));
    }

    pub fn reset(&self) {
        self.act(|c| c.reset_state());
    }

    /// Keystroke in the search box. Settled text reaches the table after the
    /// debounce window; an empty box applies at once. Only the latest
    /// keystroke keeps a live timer.
    pub fn search(&self, text: String) {
        let now = now_ms();
        let outcome = self.act(|c| c.search_input(text, now));
        match outcome {
            Some(SearchInputOutcome::Scheduled { deadline }) => {
                let handle = *self;
                let wait = deadline.saturating_sub(now) + 1;
                // never dropped from its own callback, the next arm replaces it
                let timer = Timeout::new(wait.min(u32::MAX as u64) as u32, move || {
                    handle.act(|c| c.search_poll(now_ms()));
                });
                self.search_timer.try_update_value(|t| t.arm(timer));
            }
            _ => self.cancel_search_timer(),
        }
    }

    pub fn search_clear(&self) {
        self.cancel_search_timer();
        self.act(|c| c.search_clear());
    }

    fn cancel_search_timer(&self) {
        self.search_timer.try_update_value(|t| t.cancel());
    }
}

#[derive(Debug, Clone)]
struct ColumnDrag {
    col_id: String,
    start_x: i32,
    start_width: u32,
}

fn header_width(ev: &ev::MouseEvent) -> Option<u32> {
    let handle = ev.target()?.dyn_into::<web_sys::Element>().ok()?;
    let th = handle.parent_element()?;
    Some(th.get_bounding_client_rect().width().round() as u32)
}

fn width_style(width: Option<u32>) -> String {
    width
        .map(|w| format!("width: {0}px; min-width: {0}px; max-width: {0}px;", w))
        .unwrap_or_default()
}

fn sort_indicator(sort: Option<(SortDirection, usize)>, multi: bool) -> String {
    match sort {
        None => String::new(),
        Some((direction, priority)) => {
            let arrow = match direction {
                SortDirection::Asc => "▲",
                SortDirection::Desc => "▼",
            };
            if multi {
                format!(" {}{}", arrow, priority)
            } else {
                format!(" {}", arrow)
            }
        }
    }
}

fn render_cell(
    column: &ColumnDef,
    row: &GridRow,
    badge: Option<Callback<String, (BadgeColor, String)>>,
    on_row_click: Option<Callback<String>>,
) -> AnyView {
    let text = column.display(row.value(&column.id));
    let style = width_style(column.width);
    match column.renderer {
        Some(CellRenderer::Badge) => {
            let raw = row
                .value(&column.id)
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            let (color, label) = match badge {
                Some(cb) => cb.run(raw),
                None => (BadgeColor::Informative, text),
            };
            view! {
                <td class="data-grid__cell" style=style>
                    <Badge appearance=BadgeAppearance::Tint color=color>{label}</Badge>
                </td>
            }
            .into_any()
        }
        Some(CellRenderer::Link) => {
            let row_id = row.id.clone();
            view! {
                <td class="data-grid__cell" style=style>
                    <a
                        href="#"
                        class="data-grid__link"
                        on:click=move |ev| {
                            ev.prevent_default();
                            ev.stop_propagation();
                            if let Some(cb) = on_row_click {
                                cb.run(row_id.clone());
                            }
                        }
                    >
                        {text}
                    </a>
                </td>
            }
            .into_any()
        }
        Some(CellRenderer::Money) => view! {
            <td class="data-grid__cell data-grid__cell--number" style=style>{text}</td>
        }
        .into_any(),
        Some(CellRenderer::Date) | None => view! {
            <td class="data-grid__cell" style=style>{text}</td>
        }
        .into_any(),
    }
}

/// Меню колонок: видимость, порядок, сброс настроек.
#[component]
fn ColumnMenu(grid: GridHandle) -> impl IntoView {
    let view_state = grid.view();

    view! {
        <div class="data-grid__column-menu">
            {move || {
                let columns = view_state.with(|v| v.columns.clone());
                let last = columns.len().saturating_sub(1);
                columns
                    .into_iter()
                    .enumerate()
                    .map(|(index, (column, visible))| {
                        let id_visible = column.id.clone();
                        let id_up = column.id.clone();
                        let id_down = column.id.clone();
                        view! {
                            <div class="data-grid__column-menu-item">
                                <label>
                                    <input
                                        type="checkbox"
                                        prop:checked=visible
                                        on:change=move |ev| {
                                            grid.set_column_visible(&id_visible, event_target_checked(&ev))
                                        }
                                    />
                                    {column.label.clone()}
                                </label>
                                <button
                                    class="button button--icon"
                                    title="Выше"
                                    disabled=index == 0
                                    on:click=move |_| grid.move_column(&id_up, index.saturating_sub(1))
                                >
                                    "↑"
                                </button>
                                <button
                                    class="button button--icon"
                                    title="Ниже"
                                    disabled=index == last
                                    on:click=move |_| grid.move_column(&id_down, index + 1)
                                >
                                    "↓"
                                </button>
                            </div>
                        }
                    })
                    .collect_view()
            }}
            <Button appearance=ButtonAppearance::Subtle on_click=move |_| grid.reset()>
                "Сбросить настройки"
            </Button>
        </div>
    }
}

#[component]
pub fn DataGrid(
    grid: GridHandle,
    #[prop(optional, into)] loading: MaybeProp<bool>,
    /// Called with the row id
    #[prop(optional)]
    on_row_click: Option<Callback<String>>,
    /// Color and label for the raw value of `CellRenderer::Badge` cells
    #[prop(optional)]
    badge: Option<Callback<String, (BadgeColor, String)>>,
    #[prop(optional, into)] empty_text: MaybeProp<String>,
) -> impl IntoView {
    let theme = use_theme();
    let model = grid.model();
    let view_state = grid.view();
    let features = view_state.with_untracked(|v| v.features);

    let (menu_open, set_menu_open) = signal(false);
    let drag = RwSignal::new(None::<ColumnDrag>);
    let live_width = RwSignal::new(None::<(String, u32)>);
    // mouseup after a resize also clicks the header; that click must not sort
    let suppress_header_click = RwSignal::new(false);

    let on_move = window_event_listener(ev::mousemove, move |ev| {
        let Some(state) = drag.get_untracked() else {
            return;
        };
        let delta = ev.client_x() - state.start_x;
        let width = (state.start_width as i32 + delta).max(1) as u32;
        live_width.set(Some((state.col_id, width)));
    });
    let on_up = window_event_listener(ev::mouseup, move |_| {
        if drag.get_untracked().is_none() {
            return;
        }
        drag.set(None);
        if let Some((col_id, width)) = live_width.get_untracked() {
            grid.resize_column(&col_id, width);
        }
        live_width.set(None);
        // click is dispatched right after mouseup, before any timer
        suppress_header_click.set(true);
        spawn_local(async move {
            TimeoutFuture::new(0).await;
            suppress_header_click.set(false);
        });
    });
    on_cleanup(move || {
        on_move.remove();
        on_up.remove();
    });

    let column_width = move |column: &ColumnDef| -> Option<u32> {
        live_width.with(|live| match live {
            Some((id, w)) if *id == column.id => Some(*w),
            _ => column.width,
        })
    };

    let page_all_selected = move || {
        let page_ids: Vec<String> =
            model.with(|m| m.page_rows().into_iter().map(|r| r.id).collect());
        !page_ids.is_empty()
            && view_state.with(|v| page_ids.iter().all(|id| v.selection.contains(id)))
    };

    view! {
        <div class="data-grid" style=move || theme.theme.get().grid_style()>
            <div class="data-grid__toolbar">
                <button
                    class="button button--icon"
                    title="Колонки"
                    on:click=move |_| set_menu_open.update(|open| *open = !*open)
                >
                    {icon("columns")}
                </button>
                <Show when=move || menu_open.get()>
                    <ColumnMenu grid=grid />
                </Show>
            </div>

            <div class="data-grid__viewport">
                <table class="data-grid__table">
                    <thead>
                        <tr>
                            {features.selection.then(|| view! {
                                <th class="data-grid__header-cell data-grid__header-cell--checkbox">
                                    <input
                                        type="checkbox"
                                        prop:checked=page_all_selected
                                        on:change=move |ev| grid.toggle_page(event_target_checked(&ev))
                                    />
                                </th>
                            })}
                            {move || {
                                let columns = model.with(|m| m.columns().to_vec());
                                let multi = model.with(|m| m.sort_model().len() > 1);
                                columns
                                    .into_iter()
                                    .map(|column| {
                                        let sortable = features.sorting && column.sortable;
                                        let indicator = sort_indicator(
                                            model.with(|m| m.sort_of(&column.id)),
                                            multi,
                                        );
                                        let style = width_style(column_width(&column));
                                        let col_for_sort = column.id.clone();
                                        let col_for_drag = column.id.clone();
                                        let min_width = column.min_width;
                                        view! {
                                            <th
                                                class="data-grid__header-cell"
                                                class:data-grid__header-cell--sortable=sortable
                                                style=style
                                                on:click=move |ev: ev::MouseEvent| {
                                                    if suppress_header_click.get_untracked() {
                                                        return;
                                                    }
                                                    if sortable {
                                                        grid.toggle_sort(&col_for_sort, ev.shift_key());
                                                    }
                                                }
                                            >
                                                <span class="data-grid__header-label">{column.label.clone()}</span>
                                                <span class="data-grid__sort-indicator">{indicator}</span>
                                                <span
                                                    class="data-grid__resizer"
                                                    on:mousedown=move |ev: ev::MouseEvent| {
                                                        ev.prevent_default();
                                                        ev.stop_propagation();
                                                        let start_width = header_width(&ev).unwrap_or(min_width);
                                                        drag.set(Some(ColumnDrag {
                                                            col_id: col_for_drag.clone(),
                                                            start_x: ev.client_x(),
                                                            start_width,
                                                        }));
                                                    }
                                                ></span>
                                            </th>
                                        }
                                    })
                                    .collect_view()
                            }}
                        </tr>
                        {features.filtering.then(|| view! {
                            <tr class="data-grid__filter-row">
                                {features.selection.then(|| view! { <th></th> })}
                                {move || {
                                    let columns = model.with(|m| m.columns().to_vec());
                                    columns
                                        .into_iter()
                                        .map(|column| {
                                            if !column.filterable {
                                                return view! { <th></th> }.into_any();
                                            }
                                            let col_id = column.id.clone();
                                            let current = model
                                                .with(|m| m.filter_text(&column.id).map(str::to_string))
                                                .unwrap_or_default();
                                            view! {
                                                <th>
                                                    <input
                                                        type="text"
                                                        class="data-grid__filter"
                                                        placeholder="Фильтр"
                                                        prop:value=current
                                                        on:change=move |ev| {
                                                            grid.set_column_filter(&col_id, event_target_value(&ev))
                                                        }
                                                    />
                                                </th>
                                            }
                                            .into_any()
                                        })
                                        .collect_view()
                                }}
                            </tr>
                        })}
                    </thead>
                    <tbody>
                        {move || {
                            let columns = model.with(|m| m.columns().to_vec());
                            let rows = model.with(|m| m.page_rows());
                            let selection = view_state.with(|v| v.selection.clone());
                            if rows.is_empty() {
                                let colspan = columns.len() + usize::from(features.selection);
                                let text = empty_text
                                    .get()
                                    .unwrap_or_else(|| "Нет данных".to_string());
                                return view! {
                                    <tr>
                                        <td class="data-grid__empty" colspan=colspan.to_string()>{text}</td>
                                    </tr>
                                }
                                .into_any();
                            }
                            rows.into_iter()
                                .map(|row| {
                                    let is_selected = selection.contains(&row.id);
                                    let id_for_click = row.id.clone();
                                    let id_for_check = row.id.clone();
                                    let cells = columns
                                        .iter()
                                        .map(|column| render_cell(column, &row, badge, on_row_click))
                                        .collect_view();
                                    view! {
                                        <tr
                                            class="data-grid__row"
                                            class:data-grid__row--selected=is_selected
                                            on:click=move |_| {
                                                if let Some(cb) = on_row_click {
                                                    cb.run(id_for_click.clone());
                                                }
                                            }
                                        >
                                            {features.selection.then(|| view! {
                                                <td
                                                    class="data-grid__cell data-grid__cell--checkbox"
                                                    on:click=|ev: ev::MouseEvent| ev.stop_propagation()
                                                >
                                                    <input
                                                        type="checkbox"
                                                        prop:checked=is_selected
                                                        on:change=move |ev| {
                                                            grid.toggle_row(&id_for_check, event_target_checked(&ev))
                                                        }
                                                    />
                                                </td>
                                            })}
                                            {cells}
                                        </tr>
                                    }
                                })
                                .collect_view()
                                .into_any()
                        }}
                    </tbody>
                </table>
                <Show when=move || loading.get().unwrap_or(false)>
                    <div class="data-grid__overlay">
                        <Spinner />
                    </div>
                </Show>
            </div>
        </div>
    }
}
