use burn::{
    nn::{
        attention::{MhaInput, MultiHeadAttention, MultiHeadAttentionConfig},
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::backend::AutodiffBackend,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct EncoderConfig {
    pub vocab_size: usize,
    pub max_len:    usize,
    pub d_model:    usize,
    pub num_heads:  usize,
    pub num_layers: usize,
    pub d_ff:       usize,
    pub dropout:    f64,
}

impl EncoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> ReviewEncoder<B> {
        let token_embedding    = EmbeddingConfig::new(self.vocab_size, self.d_model).init(device);
        let position_embedding = EmbeddingConfig::new(self.max_len, self.d_model).init(device);
        // Two segment ids (BERT convention), even though single-sentence
        // input only ever uses segment 0.
        let segment_embedding  = EmbeddingConfig::new(2, self.d_model).init(device);
        let layers: Vec<EncoderBlock<B>> = (0..self.num_layers)
            .map(|_| self.build_encoder_block(device))
            .collect();
        let final_norm = LayerNormConfig::new(self.d_model).init(device);
        let pooler     = LinearConfig::new(self.d_model, self.d_model).init(device);
        let dropout    = DropoutConfig::new(self.dropout).init();
        ReviewEncoder {
            token_embedding, position_embedding, segment_embedding,
            layers, final_norm, pooler, dropout,
            d_model: self.d_model,
        }
    }

    fn build_encoder_block<B: Backend>(&self, device: &B::Device) -> EncoderBlock<B> {
        let self_attn   = MultiHeadAttentionConfig::new(self.d_model, self.num_heads)
            .with_dropout(self.dropout)
            .init(device);
        let ffn_linear1 = LinearConfig::new(self.d_model, self.d_ff).init(device);
        let ffn_linear2 = LinearConfig::new(self.d_ff, self.d_model).init(device);
        let norm1   = LayerNormConfig::new(self.d_model).init(device);
        let norm2   = LayerNormConfig::new(self.d_model).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        EncoderBlock { self_attn, ffn_linear1, ffn_linear2, norm1, norm2, dropout }
    }
}

#[derive(Module, Debug)]
pub struct EncoderBlock<B: Backend> {
    pub self_attn:   MultiHeadAttention<B>,
    pub ffn_linear1: Linear<B>,
    pub ffn_linear2: Linear<B>,
    pub norm1:       LayerNorm<B>,
    pub norm2:       LayerNorm<B>,
    pub dropout:     Dropout,
}

impl<B: Backend> EncoderBlock<B> {
    pub fn forward(&self, x: Tensor<B, 3>, mask_pad: Tensor<B, 2, Bool>) -> Tensor<B, 3> {
        let attn_input  = MhaInput::self_attn(x.clone()).mask_pad(mask_pad);
        let attn_output = self.self_attn.forward(attn_input).context;
        let x = self.norm1.forward(x + self.dropout.forward(attn_output));
        let ffn_out = self.ffn_linear2.forward(
            burn::tensor::activation::gelu(self.ffn_linear1.forward(x.clone()))
        );
        self.norm2.forward(x + self.dropout.forward(ffn_out))
    }
}

#[derive(Module, Debug)]
pub struct ReviewEncoder<B: Backend> {
    pub token_embedding:    Embedding<B>,
    pub position_embedding: Embedding<B>,
    pub segment_embedding:  Embedding<B>,
    pub layers:             Vec<EncoderBlock<B>>,
    pub final_norm:         LayerNorm<B>,
    pub pooler:             Linear<B>,
    pub dropout:            Dropout,
    pub d_model:            usize,
}

impl<B: Backend> ReviewEncoder<B> {
    /// token_ids, segment_ids: [batch, max_len]; valid_lengths: [batch]
    /// → pooled representation: [batch, d_model]
    pub fn forward(
        &self,
        token_ids:     Tensor<B, 2, Int>,
        segment_ids:   Tensor<B, 2, Int>,
        valid_lengths: Tensor<B, 1, Int>,
    ) -> Tensor<B, 2> {
        let [batch_size, seq_len] = token_ids.dims();
        let device = token_ids.device();

        let tok_emb = self.token_embedding.forward(token_ids);

        // Self-attention is permutation-invariant, so position must be injected explicitly.
        let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, &device)
            .unsqueeze::<2>()
            .expand([batch_size, seq_len]);
        let pos_emb = self.position_embedding.forward(positions);
        let seg_emb = self.segment_embedding.forward(segment_ids);

        // Positions at or beyond a sample's valid length are padding.
        let mask_pad = padding_mask(valid_lengths, batch_size, seq_len, &device);

        let mut x = self.dropout.forward(tok_emb + pos_emb + seg_emb);
        for layer in &self.layers {
            x = layer.forward(x, mask_pad.clone());
        }
        let x = self.final_norm.forward(x); // [batch, seq_len, d_model]

        // First-token pooling through a tanh projection.
        let cls = x
            .slice([0..batch_size, 0..1])
            .reshape([batch_size, self.d_model]);
        self.pooler.forward(cls).tanh()
    }
}

/// Boolean padding mask: true marks positions the attention must ignore.
fn padding_mask<B: Backend>(
    valid_lengths: Tensor<B, 1, Int>,
    batch_size:    usize,
    seq_len:       usize,
    device:        &B::Device,
) -> Tensor<B, 2, Bool> {
    let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, device)
        .unsqueeze::<2>()
        .expand([batch_size, seq_len]);
    let bounds = valid_lengths
        .unsqueeze_dim::<2>(1)
        .expand([batch_size, seq_len]);
    positions.greater_equal(bounds)
}

// ─── Sentiment model ──────────────────────────────────────────────────────────

#[derive(Config, Debug)]
pub struct SentimentModelConfig {
    pub encoder:       EncoderConfig,
    pub drop_out_rate: f64,
}

impl SentimentModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SentimentModel<B> {
        SentimentModel {
            encoder: self.encoder.init(device),
            dropout: DropoutConfig::new(self.drop_out_rate).init(),
            output:  LinearConfig::new(self.encoder.d_model, 2).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct SentimentModel<B: Backend> {
    pub encoder: ReviewEncoder<B>,
    pub dropout: Dropout,
    pub output:  Linear<B>,
}

impl<B: Backend> SentimentModel<B> {
    /// → class logits: [batch, 2]
    pub fn forward(
        &self,
        token_ids:     Tensor<B, 2, Int>,
        segment_ids:   Tensor<B, 2, Int>,
        valid_lengths: Tensor<B, 1, Int>,
    ) -> Tensor<B, 2> {
        let pooled = self.encoder.forward(token_ids, segment_ids, valid_lengths);
        self.output.forward(self.dropout.forward(pooled))
    }

    pub fn forward_loss(
        &self,
        token_ids:     Tensor<B, 2, Int>,
        segment_ids:   Tensor<B, 2, Int>,
        valid_lengths: Tensor<B, 1, Int>,
        labels:        Tensor<B, 1, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>)
    where
        B: AutodiffBackend,
    {
        let logits = self.forward(token_ids, segment_ids, valid_lengths);
        let ce = burn::nn::loss::CrossEntropyLossConfig::new().init(&logits.device());
        let loss = ce.forward(logits.clone(), labels);
        (loss, logits)
    }
}

// ─── Aspect model ─────────────────────────────────────────────────────────────

#[derive(Config, Debug)]
pub struct AbsaModelConfig {
    pub encoder:         EncoderConfig,
    /// Dropout rate of the first aspect head
    pub drop_out_rate_a: f64,
    /// Dropout rate of the second aspect head
    pub drop_out_rate_b: f64,
}

impl AbsaModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> AbsaModel<B> {
        AbsaModel {
            encoder: self.encoder.init(device),
            head_a:  AspectHead::init(self.encoder.d_model, self.drop_out_rate_a, device),
            head_b:  AspectHead::init(self.encoder.d_model, self.drop_out_rate_b, device),
        }
    }
}

/// One two-class head over the shared pooled representation.
#[derive(Module, Debug)]
pub struct AspectHead<B: Backend> {
    pub dropout: Dropout,
    pub output:  Linear<B>,
}

impl<B: Backend> AspectHead<B> {
    fn init(d_model: usize, drop_out_rate: f64, device: &B::Device) -> Self {
        Self {
            dropout: DropoutConfig::new(drop_out_rate).init(),
            output:  LinearConfig::new(d_model, 2).init(device),
        }
    }

    pub fn forward(&self, pooled: Tensor<B, 2>) -> Tensor<B, 2> {
        self.output.forward(self.dropout.forward(pooled))
    }
}

pub struct AspectOutput<B: Backend> {
    /// Slot A logits: [batch, 2]
    pub primary: Tensor<B, 2>,
    /// Slot B logits: [batch, 2]
    pub secondary: Tensor<B, 2>,
}

#[derive(Module, Debug)]
pub struct AbsaModel<B: Backend> {
    pub encoder: ReviewEncoder<B>,
    pub head_a:  AspectHead<B>,
    pub head_b:  AspectHead<B>,
}

impl<B: Backend> AbsaModel<B> {
    /// Replace the freshly initialised encoder, keeping the heads.
    /// Used to start aspect training from the sentiment checkpoint.
    pub fn with_encoder(self, encoder: ReviewEncoder<B>) -> Self {
        Self { encoder, ..self }
    }

    pub fn forward(
        &self,
        token_ids:     Tensor<B, 2, Int>,
        segment_ids:   Tensor<B, 2, Int>,
        valid_lengths: Tensor<B, 1, Int>,
    ) -> AspectOutput<B> {
        let pooled = self.encoder.forward(token_ids, segment_ids, valid_lengths);
        AspectOutput {
            primary:   self.head_a.forward(pooled.clone()),
            secondary: self.head_b.forward(pooled),
        }
    }

    /// Soft cross-entropy against the 4-way targets, averaged over
    /// the two heads. targets: [batch, 4] = [neg_a, pos_a, neg_b, pos_b]
    pub fn forward_loss(
        &self,
        token_ids:     Tensor<B, 2, Int>,
        segment_ids:   Tensor<B, 2, Int>,
        valid_lengths: Tensor<B, 1, Int>,
        targets:       Tensor<B, 2>,
    ) -> (Tensor<B, 1>, AspectOutput<B>)
    where
        B: AutodiffBackend,
    {
        let output = self.forward(token_ids, segment_ids, valid_lengths);
        let [batch_size, _] = targets.dims();

        let targets_a = targets.clone().slice([0..batch_size, 0..2]);
        let targets_b = targets.slice([0..batch_size, 2..4]);

        let loss = (soft_cross_entropy(output.primary.clone(), targets_a)
                  + soft_cross_entropy(output.secondary.clone(), targets_b)) / 2.0_f64;
        (loss, output)
    }
}

/// Cross-entropy of logits against a soft target distribution,
/// averaged over the batch.
pub fn soft_cross_entropy<B: Backend>(
    logits:  Tensor<B, 2>,
    targets: Tensor<B, 2>,
) -> Tensor<B, 1> {
    let log_probs = burn::tensor::activation::log_softmax(logits, 1);
    (log_probs * targets).sum_dim(1).mean().neg()
}
