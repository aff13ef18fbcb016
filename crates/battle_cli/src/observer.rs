use battle_core::{BattleObserver, HistoryRecord, StepReport, Termination};

/// Logs every event at debug level and prints a status line every
/// `print_every` steps. Zero disables the status lines.
pub struct TracingObserver {
    print_every: u64,
}

impl TracingObserver {
    pub fn new(print_every: u64) -> Self {
        Self { print_every }
    }
}

pub fn format_status(step: u64, record: &HistoryRecord) -> String {
    format!(
        "[step={step:05}  t={time:.5}]  size_1={s1:5}  size_2={s2:5}  \
         morale_1={m1:5.1}  morale_2={m2:5.1}",
        time = record.time,
        s1 = record.size_1,
        s2 = record.size_2,
        m1 = record.morale_1,
        m2 = record.morale_2,
    )
}

impl BattleObserver for TracingObserver {
    fn on_rates_built(&mut self, laws: [&str; 2]) {
        tracing::debug!(law_1 = laws[0], law_2 = laws[1], "rate functions built");
    }

    fn on_step(&mut self, report: &StepReport) {
        tracing::debug!(
            step = report.step,
            side = %report.side,
            rate_1 = report.rates[0],
            rate_2 = report.rates[1],
            clock_1 = report.clocks[0],
            clock_2 = report.clocks[1],
            coef_1 = report.coefficients[0],
            coef_2 = report.coefficients[1],
            "casualty event"
        );
        if self.print_every > 0 && report.step % self.print_every == 0 {
            println!("{}", format_status(report.step, &report.record));
        }
    }

    fn on_terminated(&mut self, reason: Termination, last: &HistoryRecord) {
        tracing::info!(
            %reason,
            time = last.time,
            size_1 = last.size_1,
            size_2 = last.size_2,
            morale_1 = last.morale_1,
            morale_2 = last.morale_2,
            "battle over"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_shows_sizes_and_morale() {
        let record = HistoryRecord::new(0.25, [3990, 3497], [39.94, 60.01]);
        let line = format_status(100, &record);
        assert!(line.starts_with("[step=00100  t=0.25000]"));
        assert!(line.contains("size_1= 3990"));
        assert!(line.contains("morale_2= 60.0"));
    }
}
