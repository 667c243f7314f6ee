/// Политика разбиения индекса на сегменты. Маршрутизация идёт по позиции
/// документа в порядке обхода корпуса, поэтому каждый сегмент получает
/// непрерывный префикс и постинги внутри сегмента остаются отсортированными.
#[derive(Debug, Clone, Copy)]
pub enum ShardPolicy {
    /// Весь индекс в одном сегменте (бэкенд без лимитов на размер).
    Single,
    /// Не больше `cap` документов на сегмент — разбиение по порядку обработки.
    DocCountCap { cap: usize },
}

impl ShardPolicy {
    /// Номер сегмента для документа на позиции `seq` (0-based).
    pub fn segment_of(&self, seq: usize) -> usize {
        match self {
            ShardPolicy::Single => 0,
            ShardPolicy::DocCountCap { cap } => seq / (*cap).max(1),
        }
    }

    /// Сколько сегментов нужно под корпус из `total` документов.
    pub fn segment_count(&self, total: usize) -> usize {
        match self {
            ShardPolicy::Single => 1,
            ShardPolicy::DocCountCap { cap } => {
                let cap = (*cap).max(1);
                total.div_ceil(cap).max(1)
            }
        }
    }
}
