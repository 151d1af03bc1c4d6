use std::fmt::{self, Write};

use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::Registry;
use wasm_bindgen::JsValue;
use web_sys::console;

/// 把 tracing 事件写到浏览器控制台
///
/// 输出函数可替换，原生环境下用于测试。
pub struct ConsoleLayer {
    sink: fn(&Level, &str),
}

impl ConsoleLayer {
    pub fn browser() -> Self {
        Self {
            sink: write_console,
        }
    }

    pub fn with_sink(sink: fn(&Level, &str)) -> Self {
        Self { sink }
    }
}

fn write_console(level: &Level, line: &str) {
    let value = JsValue::from_str(line);
    match *level {
        Level::ERROR => console::error_1(&value),
        Level::WARN => console::warn_1(&value),
        _ => console::log_1(&value),
    }
}

// message 放在最前，其余字段按 key=value 追加
#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: String,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.fields, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.fields, " {}={:?}", field.name(), value);
        }
    }
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);
        let metadata = event.metadata();
        let line = format!(
            "[{}] {}{}",
            metadata.target(),
            visitor.message,
            visitor.fields
        );
        (self.sink)(metadata.level(), &line);
    }
}

/// 安装全局订阅者，只转发 WARN 及以上级别；已经安装过时不做任何事
pub fn init_console_logging() {
    let subscriber = Registry::default().with(ConsoleLayer::browser().with_filter(LevelFilter::WARN));
    let _ = tracing::subscriber::set_global_default(subscriber);
}
